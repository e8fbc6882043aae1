use gcs_core::{Mission, MissionId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Arm,
    Start,
    Complete,
    Abort,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arm => "arm",
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Abort => "abort",
        }
    }

    /// Name observers subscribe to.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Arm => "mission_armed",
            Self::Start => "mission_started",
            Self::Complete => "mission_completed",
            Self::Abort => "mission_aborted",
        }
    }
}

/// Published after a successful transition, carrying the full updated record.
///
/// Publication happens outside the board lock, so two events for one mission
/// can arrive out of order. Subscribers keep the highest `revision` seen.
#[derive(Debug, Clone, Serialize)]
pub struct MissionEvent {
    #[serde(skip)]
    pub transition: Transition,
    pub mission_id: MissionId,
    pub revision: u64,
    pub mission: Mission,
}

impl MissionEvent {
    pub fn new(transition: Transition, mission: Mission) -> Self {
        Self {
            transition,
            mission_id: mission.id,
            revision: mission.revision,
            mission,
        }
    }

    pub fn name(&self) -> &'static str {
        self.transition.event_name()
    }
}
