use gcs_core::{MissionId, MissionStatus};
use gcs_prearm::{CheckId, CheckResult};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArmingError {
    #[error("Mission {0} not found")]
    MissionNotFound(MissionId),
    #[error("Pre-arming checks not completed")]
    IncompleteChecks { missing: Vec<CheckId> },
    #[error("Pre-arming checks failed")]
    ChecksFailed { failed: Vec<CheckResult> },
    #[error("Drone already armed")]
    AlreadyArmed,
    #[error("Transition not allowed from status {status}")]
    InvalidState { status: MissionStatus },
    #[error("Drone not armed")]
    NotArmed { status: MissionStatus },
}

impl ArmingError {
    /// Operator-facing remediation hint.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::MissionNotFound(_) => "Create the mission before running transitions",
            Self::IncompleteChecks { .. } => {
                "All pre-arming checks must be completed before arming"
            }
            Self::ChecksFailed { .. } => "All pre-arming checks must pass before arming",
            Self::AlreadyArmed => "Mission is already armed",
            Self::InvalidState { .. } => "Mission has already left the requested state",
            Self::NotArmed { .. } => "Drone must be armed before starting mission",
        }
    }

    pub fn failed_check_ids(&self) -> Vec<CheckId> {
        match self {
            Self::ChecksFailed { failed } => failed.iter().map(|result| result.check_id).collect(),
            _ => Vec::new(),
        }
    }
}
