use serde::Serialize;
use serde_json::Number;

use crate::catalog::{CheckId, lookup};
use crate::error::PrearmError;
use crate::readings::SensorReadings;

/// Outcome of evaluating one check against one sensor-reading bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub passed: bool,
    pub message: String,
}

impl Verdict {
    fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Subsystem {
    pub name: &'static str,
    pub key: &'static str,
}

/// Evaluation rule attached to a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckRule {
    /// `roll` and `pitch` (default 0) within ±tolerance degrees.
    Attitude { tolerance_deg: f64 },
    /// A single boolean reading (default false).
    Flag {
        key: &'static str,
        pass_message: &'static str,
        fail_message: &'static str,
    },
    /// Percentage reading (default 100) at or below `max_load`.
    Load { key: &'static str, max_load: u32 },
    /// `gps_fix` (default false) and at least `min_satellites` (default 0 seen).
    SatelliteFix { min_satellites: u32 },
    /// Calibration flag (default false) younger than `max_age_days` (default age 999).
    CalibrationAge {
        subject: &'static str,
        flag_key: &'static str,
        age_key: &'static str,
        max_age_days: u32,
    },
    /// Every subsystem flag (default false) must be set.
    Subsystems { subsystems: &'static [Subsystem] },
}

const DEFAULT_LOAD: u32 = 100;
const DEFAULT_CALIBRATION_AGE_DAYS: u32 = 999;

impl CheckRule {
    pub fn apply(&self, readings: &SensorReadings) -> Verdict {
        match *self {
            Self::Attitude { tolerance_deg } => {
                let roll = as_f64(&readings.number("roll", 0));
                let pitch = as_f64(&readings.number("pitch", 0));
                if roll.abs() <= tolerance_deg && pitch.abs() <= tolerance_deg {
                    Verdict::pass(format!(
                        "UAV is level (roll: {roll:.2}°, pitch: {pitch:.2}°)"
                    ))
                } else {
                    Verdict::fail(format!(
                        "UAV not level (roll: {roll:.2}°, pitch: {pitch:.2}°, max: ±{tolerance_deg:?}°)"
                    ))
                }
            }
            Self::Flag {
                key,
                pass_message,
                fail_message,
            } => {
                if readings.flag(key, false) {
                    Verdict::pass(pass_message)
                } else {
                    Verdict::fail(fail_message)
                }
            }
            Self::Load { key, max_load } => {
                let load = readings.number(key, DEFAULT_LOAD);
                if as_f64(&load) <= f64::from(max_load) {
                    Verdict::pass(format!("CPU load OK ({load}%)"))
                } else {
                    Verdict::fail(format!("CPU load too high ({load}%, max: {max_load}%)"))
                }
            }
            Self::SatelliteFix { min_satellites } => {
                let gps_fix = readings.flag("gps_fix", false);
                let satellites = readings.number("satellites", 0);
                if gps_fix && as_f64(&satellites) >= f64::from(min_satellites) {
                    Verdict::pass(format!(
                        "Navigation safe (GPS fix, {satellites} satellites)"
                    ))
                } else {
                    Verdict::fail(format!(
                        "Navigation unsafe (GPS: {gps_fix}, Sats: {satellites})"
                    ))
                }
            }
            Self::CalibrationAge {
                subject,
                flag_key,
                age_key,
                max_age_days,
            } => {
                let calibrated = readings.flag(flag_key, false);
                let age = readings.number(age_key, DEFAULT_CALIBRATION_AGE_DAYS);
                if calibrated && as_f64(&age) < f64::from(max_age_days) {
                    Verdict::pass(format!("{subject} calibrated ({age} days ago)"))
                } else {
                    Verdict::fail(format!("{subject} calibration required or outdated"))
                }
            }
            Self::Subsystems { subsystems } => {
                let issues: Vec<&str> = subsystems
                    .iter()
                    .filter(|subsystem| !readings.flag(subsystem.key, false))
                    .map(|subsystem| subsystem.name)
                    .collect();
                if issues.is_empty() {
                    Verdict::pass("All hardware healthy")
                } else {
                    Verdict::fail(format!("Hardware issues: {}", issues.join(", ")))
                }
            }
        }
    }
}

fn as_f64(value: &Number) -> f64 {
    value.as_f64().unwrap_or_default()
}

pub fn evaluate(check: CheckId, readings: &SensorReadings) -> Verdict {
    check.definition().rule.apply(readings)
}

/// String-keyed entry point for callers holding an unvalidated check id.
pub fn evaluate_key(key: &str, readings: &SensorReadings) -> Result<Verdict, PrearmError> {
    lookup(key).map(|definition| definition.rule.apply(readings))
}
