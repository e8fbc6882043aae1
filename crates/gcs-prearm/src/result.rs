use gcs_core::Timestamp;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::catalog::{CheckDefinition, CheckId, CHECK_COUNT};
use crate::evaluator::{CheckRule, Verdict};
use crate::readings::SensorReadings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pending,
    Completed,
}

const NOT_CHECKED: &str = "Not checked";

/// Latest verdict for one check of one mission.
///
/// Serializes with the catalog rule's parameters (`kind`, thresholds)
/// alongside the verdict.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CheckResult {
    pub check_id: CheckId,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(flatten)]
    pub rule: CheckRule,
    pub status: CheckStatus,
    pub passed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_data: Option<SensorReadings>,
    pub timestamp: Option<Timestamp>,
}

impl CheckResult {
    pub fn unchecked(definition: &CheckDefinition) -> Self {
        Self {
            check_id: definition.id,
            name: definition.name,
            description: definition.description,
            rule: definition.rule,
            status: CheckStatus::Pending,
            passed: false,
            message: NOT_CHECKED.to_string(),
            sensor_data: None,
            timestamp: None,
        }
    }

    pub fn completed(
        definition: &CheckDefinition,
        verdict: Verdict,
        readings: SensorReadings,
        at: Timestamp,
    ) -> Self {
        Self {
            check_id: definition.id,
            name: definition.name,
            description: definition.description,
            rule: definition.rule,
            status: CheckStatus::Completed,
            passed: verdict.passed,
            message: verdict.message,
            sensor_data: Some(readings),
            timestamp: Some(at),
        }
    }

    pub fn is_recorded(&self) -> bool {
        self.status == CheckStatus::Completed
    }
}

/// Exactly one result slot per catalog entry, indexed by `CheckId::index`.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSet {
    results: [CheckResult; CHECK_COUNT],
}

impl CheckSet {
    pub fn unchecked() -> Self {
        Self {
            results: CheckId::ALL.map(|id| CheckResult::unchecked(id.definition())),
        }
    }

    pub(crate) fn from_results(results: [CheckResult; CHECK_COUNT]) -> Self {
        Self { results }
    }

    pub fn get(&self, check: CheckId) -> &CheckResult {
        &self.results[check.index()]
    }

    pub fn set(&mut self, result: CheckResult) {
        let index = result.check_id.index();
        self.results[index] = result;
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|result| result.passed)
    }

    pub fn recorded_count(&self) -> usize {
        self.results.iter().filter(|result| result.is_recorded()).count()
    }

    pub fn missing(&self) -> Vec<CheckId> {
        self.results
            .iter()
            .filter(|result| !result.is_recorded())
            .map(|result| result.check_id)
            .collect()
    }

    pub fn failed(&self) -> Vec<CheckResult> {
        self.results
            .iter()
            .filter(|result| !result.passed)
            .cloned()
            .collect()
    }
}

impl Default for CheckSet {
    fn default() -> Self {
        Self::unchecked()
    }
}

impl Serialize for CheckSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CHECK_COUNT))?;
        for result in &self.results {
            map.serialize_entry(result.check_id.as_str(), result)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcs_core::now_utc;

    #[test]
    fn unchecked_set_is_pending_and_not_passed() {
        let set = CheckSet::unchecked();
        assert_eq!(set.recorded_count(), 0);
        assert!(!set.all_passed());
        for result in set.iter() {
            assert_eq!(result.status, CheckStatus::Pending);
            assert_eq!(result.message, "Not checked");
            assert!(result.timestamp.is_none());
        }
        assert_eq!(set.missing(), CheckId::ALL.to_vec());
    }

    #[test]
    fn set_overwrites_single_slot() {
        let mut set = CheckSet::unchecked();
        let definition = CheckId::CpuLoad.definition();
        let verdict = Verdict {
            passed: true,
            message: "CPU load OK (10%)".to_string(),
        };
        set.set(CheckResult::completed(
            definition,
            verdict,
            SensorReadings::new().with("cpu_load", 10),
            now_utc(),
        ));
        assert_eq!(set.recorded_count(), 1);
        assert!(set.get(CheckId::CpuLoad).passed);
        assert_eq!(set.failed().len(), CHECK_COUNT - 1);
    }

    #[test]
    fn serializes_as_map_in_catalog_order() {
        let value = serde_json::to_value(CheckSet::unchecked()).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        let expected: Vec<&str> = CheckId::ALL.iter().map(CheckId::as_str).collect();
        assert_eq!(keys, expected);
        assert_eq!(value["cpu_load"]["status"], "pending");
        assert_eq!(value["cpu_load"]["name"], "CPU Load");
    }

    #[test]
    fn result_carries_rule_parameters() {
        let value = serde_json::to_value(CheckSet::unchecked()).unwrap();
        assert_eq!(value["cpu_load"]["kind"], "load");
        assert_eq!(value["cpu_load"]["max_load"], 80);
        assert_eq!(value["uav_levelled"]["tolerance_deg"], 5.0);
        assert_eq!(value["navigation_safe"]["min_satellites"], 6);

        let flag = &value["settings_validated"];
        assert_eq!(flag["kind"], "flag");
        assert_eq!(flag["passed"], false);
        assert_eq!(flag["fail_message"], "Settings validation failed");
    }
}
