use actix_web::{get, post, web, HttpResponse};
use gcs_core::{now_utc, GcsError, Mission, MissionDraft};
use gcs_mission::{ArmingError, MissionEvent, Transition};
use serde::{Deserialize, Serialize};

use crate::routes::common::{arming_error, error_response, parse_mission_id};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize)]
struct TransitionResponse {
    message: &'static str,
    mission: Mission,
    #[serde(skip_serializing_if = "Option::is_none")]
    can_start_mission: Option<bool>,
}

#[get("/v1/missions")]
pub async fn list_missions(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> HttpResponse {
    let limit = query.limit.unwrap_or(100);
    let offset = query.offset.unwrap_or(0);

    let missions: Vec<Mission> = state
        .board
        .list()
        .into_iter()
        .skip(offset)
        .take(limit)
        .collect();
    HttpResponse::Ok().json(missions)
}

#[post("/v1/missions")]
pub async fn create_mission(
    state: web::Data<AppState>,
    payload: web::Json<MissionDraft>,
) -> HttpResponse {
    let mission = match payload.into_inner().into_mission(now_utc()) {
        Ok(mission) => mission,
        Err(err) => return error_response(&err),
    };

    state.board.register(mission.clone());
    state.persist(&mission).await;
    tracing::info!(mission_id = %mission.id, name = %mission.name, "mission created");
    HttpResponse::Created().json(mission)
}

#[get("/v1/missions/{id}")]
pub async fn get_mission(state: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    let mission_id = match parse_mission_id(&id) {
        Ok(value) => value,
        Err(response) => return response,
    };

    match state.board.get(mission_id) {
        Some(mission) => HttpResponse::Ok().json(mission),
        None => error_response(&GcsError::not_found(format!("Mission {mission_id} not found"))),
    }
}

#[post("/v1/missions/{id}/arm")]
pub async fn arm_mission(state: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    let mission_id = match parse_mission_id(&id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let outcome = state.board.arm(mission_id);
    commit(&state, Transition::Arm, outcome).await
}

#[post("/v1/missions/{id}/start")]
pub async fn start_mission(state: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    let mission_id = match parse_mission_id(&id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let outcome = state.board.start(mission_id);
    commit(&state, Transition::Start, outcome).await
}

#[post("/v1/missions/{id}/complete")]
pub async fn complete_mission(state: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    let mission_id = match parse_mission_id(&id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let outcome = state.board.complete(mission_id);
    commit(&state, Transition::Complete, outcome).await
}

#[post("/v1/missions/{id}/abort")]
pub async fn abort_mission(state: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    let mission_id = match parse_mission_id(&id) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let outcome = state.board.abort(mission_id);
    commit(&state, Transition::Abort, outcome).await
}

/// Persists and broadcasts an applied transition. Runs after the board has
/// released the mission's lock.
async fn commit(
    state: &AppState,
    transition: Transition,
    outcome: Result<Mission, ArmingError>,
) -> HttpResponse {
    let mission = match outcome {
        Ok(mission) => mission,
        Err(err) => return arming_error(err),
    };

    state.persist(&mission).await;
    state.publish(MissionEvent::new(transition, mission.clone()));

    let (message, can_start_mission) = match transition {
        Transition::Arm => ("Drone armed successfully", Some(true)),
        Transition::Start => ("Mission started", None),
        Transition::Complete => ("Mission completed", None),
        Transition::Abort => ("Mission aborted", None),
    };
    HttpResponse::Ok().json(TransitionResponse {
        message,
        mission,
        can_start_mission,
    })
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, web, App};
    use gcs_core::MissionId;
    use gcs_storage::MissionRepository;
    use serde_json::{json, Value};

    use crate::routes::configure;
    use crate::state::test_state;

    fn passing_sensor_data() -> Value {
        json!({
            "uav_levelled": { "roll": 0, "pitch": 0 },
            "runtime_calibration": { "calibration_valid": true },
            "cpu_load": { "cpu_load": 10 },
            "navigation_safe": { "gps_fix": true, "satellites": 10 },
            "compass_calibrated": { "compass_calibrated": true, "calibration_age_days": 1 },
            "accelerometer_calibrated": { "accelerometer_calibrated": true },
            "settings_validated": { "settings_valid": true },
            "hardware_health": { "battery_ok": true, "motors_ok": true, "sensors_ok": true }
        })
    }

    #[actix_web::test]
    async fn mission_flow_from_checks_to_start() {
        let state = web::Data::new(test_state());
        let mut events = state.subscribe();
        let app = test::init_service(
            App::new().app_data(state.clone()).configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/missions")
            .set_json(json!({ "name": "Larvae sweep", "sector": "North", "duration": "30 min" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["status"], "pending");
        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/v1/missions/{id}/start"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Drone not armed");

        let req = test::TestRequest::post()
            .uri("/v1/prearm/check-all")
            .set_json(json!({ "mission_id": id, "sensor_data": passing_sensor_data() }))
            .to_request();
        let checks: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(checks["all_passed"], true);

        let req = test::TestRequest::post()
            .uri(&format!("/v1/missions/{id}/arm"))
            .to_request();
        let armed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(armed["message"], "Drone armed successfully");
        assert_eq!(armed["can_start_mission"], true);
        assert_eq!(armed["mission"]["status"], "armed");
        assert_eq!(armed["mission"]["prearm_checks_passed"], true);
        assert!(armed["mission"]["armed_at"].is_string());

        let req = test::TestRequest::post()
            .uri(&format!("/v1/missions/{id}/start"))
            .to_request();
        let started: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(started["mission"]["status"], "in-progress");

        let armed_event = events.try_recv().unwrap();
        assert_eq!(armed_event.name(), "mission_armed");
        let started_event = events.try_recv().unwrap();
        assert_eq!(started_event.name(), "mission_started");

        let mission_id: MissionId = id.parse().unwrap();
        let stored = state.repository.get(mission_id).await.unwrap().unwrap();
        assert_eq!(stored.status.as_str(), "in-progress");
    }

    #[actix_web::test]
    async fn arm_reports_failed_checks() {
        let state = web::Data::new(test_state());
        let app = test::init_service(
            App::new().app_data(state.clone()).configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/missions")
            .set_json(json!({ "name": "Drainage check", "duration": "15 min" }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/v1/missions/{id}/arm"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Pre-arming checks not completed");
        assert_eq!(body["missing_checks"].as_array().unwrap().len(), 8);

        let mut sensor_data = passing_sensor_data();
        sensor_data["cpu_load"] = json!({ "cpu_load": 97 });
        let req = test::TestRequest::post()
            .uri("/v1/prearm/check-all")
            .set_json(json!({ "mission_id": id, "sensor_data": sensor_data }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri(&format!("/v1/missions/{id}/arm"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Pre-arming checks failed");
        let failed = body["failed_checks"].as_array().unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0]["check_id"], "cpu_load");
        assert_eq!(failed[0]["message"], "CPU load too high (97%, max: 80%)");
    }

    #[actix_web::test]
    async fn blank_name_and_unknown_mission_are_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/missions")
            .set_json(json!({ "name": "  ", "duration": "15 min" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri(&format!("/v1/missions/{}/arm", MissionId::new()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/v1/missions/not-a-uuid")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let missing = MissionId::new();
        let req = test::TestRequest::get()
            .uri(&format!("/v1/missions/{missing}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], format!("Mission {missing} not found"));
    }
}
