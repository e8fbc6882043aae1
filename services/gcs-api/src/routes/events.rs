use actix_web::web::Bytes;
use actix_web::{get, web, HttpResponse};
use futures_util::stream::unfold;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::timeout;
use tracing::warn;

use crate::state::AppState;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

#[get("/v1/stream/events")]
pub async fn mission_events(state: web::Data<AppState>) -> HttpResponse {
    let receiver = state.subscribe();
    let stream = unfold((receiver, 0u64), |(mut receiver, counter)| async move {
        loop {
            match timeout(HEARTBEAT_INTERVAL, receiver.recv()).await {
                Ok(Ok(event)) => {
                    let data = match serde_json::to_string(&event) {
                        Ok(data) => data,
                        Err(err) => {
                            warn!(
                                event = event.name(),
                                error = %err,
                                "failed to encode mission event"
                            );
                            continue;
                        }
                    };
                    let payload = format!(
                        "event: {}\nid: {}:{}\ndata: {}\n\n",
                        event.name(),
                        event.mission_id,
                        event.revision,
                        data
                    );
                    let bytes = Bytes::from(payload);
                    return Some((Ok::<Bytes, actix_web::Error>(bytes), (receiver, counter)));
                }
                Ok(Err(RecvError::Lagged(skipped))) => {
                    warn!(skipped, "event subscriber lagging, dropped events");
                }
                Ok(Err(RecvError::Closed)) => return None,
                Err(_) => {
                    let payload = format!("event: heartbeat\ndata: {}\n\n", counter);
                    let bytes = Bytes::from(payload);
                    return Some((Ok(bytes), (receiver, counter + 1)));
                }
            }
        }
    });

    HttpResponse::Ok()
        .insert_header(("Content-Type", "text/event-stream"))
        .insert_header(("Cache-Control", "no-cache"))
        .insert_header(("Connection", "keep-alive"))
        .streaming(stream)
}
