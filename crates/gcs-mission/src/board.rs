use dashmap::DashMap;
use gcs_core::{now_utc, Mission, MissionId, MissionStatus};
use gcs_prearm::{CheckResultStore, CheckSet};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ArmingError;
use crate::event::Transition;

/// Authoritative in-memory mission status.
///
/// Each transition runs while holding the mission's entry lock, so exactly one
/// of two racing `arm` calls observes `pending`. Lock order is always mission
/// entry, then check store entry; the check store never reaches back here.
/// Nothing is persisted or broadcast from inside the lock.
#[derive(Debug)]
pub struct MissionBoard {
    missions: DashMap<MissionId, Mission>,
    checks: Arc<CheckResultStore>,
}

impl MissionBoard {
    pub fn new(checks: Arc<CheckResultStore>) -> Self {
        Self {
            missions: DashMap::new(),
            checks,
        }
    }

    pub fn checks(&self) -> &CheckResultStore {
        &self.checks
    }

    /// Inserts or replaces a mission record (creation and hydration).
    pub fn register(&self, mission: Mission) {
        self.missions.insert(mission.id, mission);
    }

    pub fn get(&self, mission_id: MissionId) -> Option<Mission> {
        self.missions
            .get(&mission_id)
            .map(|entry| entry.value().clone())
    }

    /// Newest first.
    pub fn list(&self) -> Vec<Mission> {
        let mut missions: Vec<Mission> = self
            .missions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        missions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        missions
    }

    pub fn len(&self) -> usize {
        self.missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    pub fn arm(&self, mission_id: MissionId) -> Result<Mission, ArmingError> {
        self.transition(mission_id, Transition::Arm, |mission, checks| {
            match mission.status {
                MissionStatus::Pending => {}
                MissionStatus::Armed => return Err(ArmingError::AlreadyArmed),
                status => return Err(ArmingError::InvalidState { status }),
            }

            let checks = checks.snapshot(mission.id).unwrap_or_else(CheckSet::unchecked);
            let missing = checks.missing();
            if !missing.is_empty() {
                return Err(ArmingError::IncompleteChecks { missing });
            }
            let failed = checks.failed();
            if !failed.is_empty() {
                return Err(ArmingError::ChecksFailed { failed });
            }

            mission.status = MissionStatus::Armed;
            mission.prearm_checks_passed = true;
            mission.armed_at = Some(now_utc());
            Ok(())
        })
    }

    pub fn start(&self, mission_id: MissionId) -> Result<Mission, ArmingError> {
        self.transition(mission_id, Transition::Start, |mission, _| {
            if mission.status != MissionStatus::Armed {
                return Err(ArmingError::NotArmed {
                    status: mission.status,
                });
            }
            mission.status = MissionStatus::InProgress;
            mission.start_time = Some(now_utc());
            Ok(())
        })
    }

    pub fn complete(&self, mission_id: MissionId) -> Result<Mission, ArmingError> {
        self.transition(mission_id, Transition::Complete, |mission, _| {
            if mission.status != MissionStatus::InProgress {
                return Err(ArmingError::InvalidState {
                    status: mission.status,
                });
            }
            mission.status = MissionStatus::Completed;
            mission.end_time = Some(now_utc());
            Ok(())
        })
    }

    pub fn abort(&self, mission_id: MissionId) -> Result<Mission, ArmingError> {
        self.transition(mission_id, Transition::Abort, |mission, _| {
            if mission.status.is_terminal() {
                return Err(ArmingError::InvalidState {
                    status: mission.status,
                });
            }
            mission.status = MissionStatus::Aborted;
            mission.end_time = Some(now_utc());
            Ok(())
        })
    }

    fn transition<F>(
        &self,
        mission_id: MissionId,
        transition: Transition,
        apply: F,
    ) -> Result<Mission, ArmingError>
    where
        F: FnOnce(&mut Mission, &CheckResultStore) -> Result<(), ArmingError>,
    {
        let outcome = match self.missions.get_mut(&mission_id) {
            Some(mut entry) => apply(entry.value_mut(), &self.checks).map(|()| {
                let mission = entry.value_mut();
                mission.revision += 1;
                mission.clone()
            }),
            None => Err(ArmingError::MissionNotFound(mission_id)),
        };

        match &outcome {
            Ok(mission) => {
                info!(
                    mission_id = %mission_id,
                    transition = transition.as_str(),
                    status = %mission.status,
                    revision = mission.revision,
                    "mission transition applied"
                );
                record_transition(transition, "ok");
            }
            Err(err) => {
                warn!(
                    mission_id = %mission_id,
                    transition = transition.as_str(),
                    error = %err,
                    failed_checks = ?err.failed_check_ids(),
                    "mission transition rejected"
                );
                record_transition(transition, "rejected");
            }
        }
        outcome
    }
}

fn record_transition(transition: Transition, outcome: &'static str) {
    metrics::counter!(
        "gcs_mission_transitions_total",
        "transition" => transition.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}
