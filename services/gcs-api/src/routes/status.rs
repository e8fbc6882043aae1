use actix_web::{get, web, HttpResponse};
use gcs_core::{now_utc, Timestamp};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct StatusResponse {
    service: String,
    environment: String,
    region: Option<String>,
    missions: usize,
    timestamp: Timestamp,
}

#[get("/v1/status")]
pub async fn status(state: web::Data<AppState>) -> HttpResponse {
    let response = StatusResponse {
        service: state.config.service_name.clone(),
        environment: state.config.environment.to_string(),
        region: state.config.region.clone(),
        missions: state.board.len(),
        timestamp: now_utc(),
    };

    HttpResponse::Ok().json(response)
}
