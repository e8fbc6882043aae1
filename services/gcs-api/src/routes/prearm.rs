use actix_web::{get, post, web, HttpResponse};
use gcs_core::{now_utc, MissionId, Timestamp};
use gcs_prearm::{CheckId, CheckSet, ReadingsByCheck, SensorReadings, CATALOG};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::routes::common::{parse_mission_id, prearm_error};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct CheckSetResponse {
    mission_id: MissionId,
    all_passed: bool,
    can_arm: bool,
    checks: CheckSet,
    timestamp: Timestamp,
}

impl CheckSetResponse {
    fn new(mission_id: MissionId, checks: CheckSet) -> Self {
        let all_passed = checks.all_passed();
        Self {
            mission_id,
            all_passed,
            can_arm: all_passed,
            checks,
            timestamp: now_utc(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub mission_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub mission_id: String,
    pub check_id: String,
    #[serde(default)]
    pub sensor_data: Value,
}

#[derive(Debug, Deserialize)]
pub struct CheckAllRequest {
    pub mission_id: String,
    #[serde(default)]
    pub sensor_data: ReadingsByCheck,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub mission_id: String,
}

#[derive(Debug, Serialize)]
struct ResetResponse {
    message: &'static str,
    mission_id: MissionId,
}

#[get("/v1/prearm/checks")]
pub async fn list_checks() -> HttpResponse {
    HttpResponse::Ok().json(&CATALOG[..])
}

#[get("/v1/prearm/status")]
pub async fn check_status(
    state: web::Data<AppState>,
    query: web::Query<StatusQuery>,
) -> HttpResponse {
    let mission_id = match parse_mission_id(&query.mission_id) {
        Ok(value) => value,
        Err(response) => return response,
    };

    let checks = state.checks().get_all(mission_id);
    HttpResponse::Ok().json(CheckSetResponse::new(mission_id, checks))
}

#[post("/v1/prearm/check")]
pub async fn perform_check(
    state: web::Data<AppState>,
    payload: web::Json<CheckRequest>,
) -> HttpResponse {
    let request = payload.into_inner();
    let mission_id = match parse_mission_id(&request.mission_id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let check = match request.check_id.parse::<CheckId>() {
        Ok(value) => value,
        Err(err) => return prearm_error(err),
    };

    let readings = SensorReadings::from_value(request.sensor_data);
    let result = state.checks().upsert_one(mission_id, check, readings);
    HttpResponse::Ok().json(result)
}

#[post("/v1/prearm/check-all")]
pub async fn perform_all_checks(
    state: web::Data<AppState>,
    payload: web::Json<CheckAllRequest>,
) -> HttpResponse {
    let request = payload.into_inner();
    let mission_id = match parse_mission_id(&request.mission_id) {
        Ok(value) => value,
        Err(response) => return response,
    };

    let checks = state.checks().upsert_all(mission_id, &request.sensor_data);
    HttpResponse::Ok().json(CheckSetResponse::new(mission_id, checks))
}

#[post("/v1/prearm/reset")]
pub async fn reset_checks(
    state: web::Data<AppState>,
    payload: web::Json<ResetRequest>,
) -> HttpResponse {
    let mission_id = match parse_mission_id(&payload.mission_id) {
        Ok(value) => value,
        Err(response) => return response,
    };

    state.checks().reset(mission_id);
    HttpResponse::Ok().json(ResetResponse {
        message: "Pre-arming checks reset",
        mission_id,
    })
}
