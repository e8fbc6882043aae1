use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use gcs_core::{ErrorCode, GcsError, MissionId};
use gcs_mission::ArmingError;
use gcs_prearm::{CheckId, CheckResult, PrearmError};
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_checks: Option<Vec<CheckId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_checks: Option<Vec<CheckResult>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Self::default()
        }
    }
}

pub fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(message))
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
    }
}

pub fn error_response(err: &GcsError) -> HttpResponse {
    HttpResponse::build(status_for(err.code)).json(ErrorResponse::new(err.message.clone()))
}

pub fn prearm_error(err: PrearmError) -> HttpResponse {
    match err {
        PrearmError::UnknownCheck(_) => bad_request("Invalid check ID"),
    }
}

fn arming_code(err: &ArmingError) -> ErrorCode {
    match err {
        ArmingError::MissionNotFound(_) => ErrorCode::NotFound,
        ArmingError::IncompleteChecks { .. }
        | ArmingError::ChecksFailed { .. }
        | ArmingError::NotArmed { .. } => ErrorCode::InvalidInput,
        ArmingError::AlreadyArmed | ArmingError::InvalidState { .. } => ErrorCode::Conflict,
    }
}

pub fn arming_error(err: ArmingError) -> HttpResponse {
    let status = status_for(arming_code(&err));
    let mut body = ErrorResponse::new(err.to_string());
    body.message = Some(err.guidance().to_string());
    match err {
        ArmingError::IncompleteChecks { missing } => body.missing_checks = Some(missing),
        ArmingError::ChecksFailed { failed } => body.failed_checks = Some(failed),
        _ => {}
    }
    HttpResponse::build(status).json(body)
}

pub fn parse_mission_id(value: &str) -> Result<MissionId, HttpResponse> {
    value
        .parse::<MissionId>()
        .map_err(|_| bad_request("invalid mission id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcs_core::MissionStatus;

    #[test]
    fn core_errors_map_to_status_codes() {
        let cases = [
            (GcsError::invalid_input("mission name is required"), StatusCode::BAD_REQUEST),
            (GcsError::not_found("mission not found"), StatusCode::NOT_FOUND),
        ];
        for (err, expected) in cases {
            assert_eq!(error_response(&err).status(), expected);
        }
    }

    #[test]
    fn arming_errors_map_to_status_codes() {
        let cases = [
            (ArmingError::MissionNotFound(MissionId::new()), StatusCode::NOT_FOUND),
            (
                ArmingError::IncompleteChecks { missing: vec![] },
                StatusCode::BAD_REQUEST,
            ),
            (ArmingError::AlreadyArmed, StatusCode::CONFLICT),
            (
                ArmingError::InvalidState {
                    status: MissionStatus::Aborted,
                },
                StatusCode::CONFLICT,
            ),
            (
                ArmingError::NotArmed {
                    status: MissionStatus::Pending,
                },
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(arming_error(err).status(), expected);
        }
    }

    #[test]
    fn malformed_mission_id_is_bad_request() {
        let response = parse_mission_id("current").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
