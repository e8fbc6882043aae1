use dashmap::DashMap;
use gcs_core::{now_utc, MissionId};
use tracing::debug;

use crate::catalog::{CheckId, CHECK_COUNT};
use crate::evaluator::{evaluate, Verdict};
use crate::readings::{ReadingsByCheck, SensorReadings};
use crate::result::{CheckResult, CheckSet};

/// Latest check verdicts per mission.
///
/// Every per-mission operation runs under that mission's map entry lock, so a
/// reset and an upsert for the same id never interleave. Evaluation is pure
/// and happens before the lock is taken.
#[derive(Debug, Default)]
pub struct CheckResultStore {
    missions: DashMap<MissionId, CheckSet>,
}

impl CheckResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mission's results, seeding an all-pending set on first access.
    pub fn get_all(&self, mission_id: MissionId) -> CheckSet {
        self.missions
            .entry(mission_id)
            .or_insert_with(CheckSet::unchecked)
            .value()
            .clone()
    }

    /// Read-only view; never seeds.
    pub fn snapshot(&self, mission_id: MissionId) -> Option<CheckSet> {
        self.missions.get(&mission_id).map(|entry| entry.value().clone())
    }

    pub fn upsert_one(
        &self,
        mission_id: MissionId,
        check: CheckId,
        readings: SensorReadings,
    ) -> CheckResult {
        let verdict = evaluate(check, &readings);
        record_evaluation(mission_id, check, &verdict);
        let result = CheckResult::completed(check.definition(), verdict, readings, now_utc());

        self.missions
            .entry(mission_id)
            .or_insert_with(CheckSet::unchecked)
            .set(result.clone());
        result
    }

    /// Re-evaluates every check in catalog order and replaces the whole set.
    pub fn upsert_all(&self, mission_id: MissionId, readings: &ReadingsByCheck) -> CheckSet {
        let at = now_utc();
        let results: [CheckResult; CHECK_COUNT] = CheckId::ALL.map(|check| {
            let bag = readings.for_check(check);
            let verdict = evaluate(check, &bag);
            record_evaluation(mission_id, check, &verdict);
            CheckResult::completed(check.definition(), verdict, bag, at)
        });
        let set = CheckSet::from_results(results);

        self.missions.insert(mission_id, set.clone());
        set
    }

    /// Drops the mission's entry. Returns whether one existed.
    pub fn reset(&self, mission_id: MissionId) -> bool {
        let removed = self.missions.remove(&mission_id).is_some();
        debug!(mission_id = %mission_id, removed, "pre-arm checks reset");
        removed
    }

    pub fn all_passed(&self, mission_id: MissionId) -> bool {
        self.missions
            .get(&mission_id)
            .is_some_and(|entry| entry.all_passed())
    }
}

fn record_evaluation(mission_id: MissionId, check: CheckId, verdict: &Verdict) {
    debug!(
        mission_id = %mission_id,
        check = check.as_str(),
        passed = verdict.passed,
        message = %verdict.message,
        "pre-arm check evaluated"
    );
    metrics::counter!(
        "gcs_prearm_evaluations_total",
        "check" => check.as_str(),
        "passed" => if verdict.passed { "true" } else { "false" }
    )
    .increment(1);
}
