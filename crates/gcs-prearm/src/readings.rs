use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::catalog::CheckId;

/// Flat key → value bag of raw sensor measurements.
///
/// Lookups are total: a missing key, or a value of the wrong JSON type, both
/// resolve to the caller's default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorReadings(Map<String, Value>);

impl SensorReadings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-object values become an empty bag.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(value)) => *value,
            _ => default,
        }
    }

    /// Keeps the integer/float form the measurement arrived in, for display.
    pub fn number(&self, key: &str, default: impl Into<Number>) -> Number {
        match self.0.get(key) {
            Some(Value::Number(value)) if value.as_f64().is_some() => value.clone(),
            _ => default.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Bulk-evaluation input: one bag per check id. Unknown ids are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadingsByCheck(Map<String, Value>);

impl ReadingsByCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, check: CheckId, readings: SensorReadings) -> Self {
        self.0
            .insert(check.as_str().to_string(), Value::Object(readings.0));
        self
    }

    pub fn for_check(&self, check: CheckId) -> SensorReadings {
        self.0
            .get(check.as_str())
            .cloned()
            .map(SensorReadings::from_value)
            .unwrap_or_default()
    }
}
