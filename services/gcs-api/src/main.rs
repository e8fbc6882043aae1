mod routes;
mod state;

use actix_web::{web, App, HttpServer};
use gcs_config::ServiceConfig;
use gcs_observability::{init, log_startup, ObservabilityConfig};
use gcs_storage::{MemoryMissionRepository, MissionRepository};
use std::io;
use std::sync::Arc;

use crate::state::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = ServiceConfig::from_env("gcs-api");
    let obs_config = ObservabilityConfig {
        service_name: config.service_name.clone(),
        environment: config.environment.to_string(),
        log_level: config.log_level.clone(),
        metrics_addr: config.metrics_addr.clone(),
    };
    let handle = init(&obs_config);
    log_startup(&handle, &obs_config.environment, &config.bind_addr);

    let repository: Arc<dyn MissionRepository> = Arc::new(MemoryMissionRepository::new());
    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config, repository);
    if let Err(err) = state.hydrate().await {
        tracing::warn!(error = %err, "starting with an empty mission board");
    }
    let shared_state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(shared_state.clone())
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
