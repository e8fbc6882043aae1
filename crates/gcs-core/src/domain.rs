use crate::error::{GcsError, GcsResult};
use crate::ids::MissionId;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mission lifecycle. Only advances `pending → armed → in-progress → (completed | aborted)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissionStatus {
    Pending,
    Armed,
    InProgress,
    Completed,
    Aborted,
}

impl MissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Armed => "armed",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }
}

impl Default for MissionStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
    pub duration: String,
    #[serde(default)]
    pub status: MissionStatus,
    #[serde(default)]
    pub prearm_checks_passed: bool,
    #[serde(default)]
    pub total_distance: f64,
    #[serde(default)]
    pub max_altitude: f64,
    #[serde(default)]
    pub avg_speed: f64,
    #[serde(default)]
    pub breeding_sites_detected: u32,
    pub created_at: Timestamp,
    #[serde(default)]
    pub armed_at: Option<Timestamp>,
    #[serde(default)]
    pub start_time: Option<Timestamp>,
    #[serde(default)]
    pub end_time: Option<Timestamp>,
    /// Bumped on every applied transition; stale writes compare lower.
    #[serde(default)]
    pub revision: u64,
}

impl Mission {
    /// Whether this record supersedes `other` for the same mission.
    pub fn is_newer_than(&self, other: &Mission) -> bool {
        self.revision > other.revision
    }
}

/// Client-supplied fields for a new mission.
#[derive(Debug, Clone, Deserialize)]
pub struct MissionDraft {
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
    pub duration: String,
}

impl MissionDraft {
    pub fn into_mission(self, created_at: Timestamp) -> GcsResult<Mission> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(GcsError::invalid_input("mission name is required"));
        }
        let duration = self.duration.trim();
        if duration.is_empty() {
            return Err(GcsError::invalid_input("mission duration is required"));
        }
        let sector = self
            .sector
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Mission {
            id: MissionId::new(),
            name: name.to_string(),
            sector,
            duration: duration.to_string(),
            status: MissionStatus::Pending,
            prearm_checks_passed: false,
            total_distance: 0.0,
            max_altitude: 0.0,
            avg_speed: 0.0,
            breeding_sites_detected: 0,
            created_at,
            armed_at: None,
            start_time: None,
            end_time: None,
            revision: 0,
        })
    }
}
