use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PrearmError;
use crate::evaluator::{CheckRule, Subsystem};

pub const CHECK_COUNT: usize = 8;

/// Identity of a recognized pre-arm check. Declaration order is catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    UavLevelled,
    RuntimeCalibration,
    CpuLoad,
    NavigationSafe,
    CompassCalibrated,
    AccelerometerCalibrated,
    SettingsValidated,
    HardwareHealth,
}

impl CheckId {
    pub const ALL: [CheckId; CHECK_COUNT] = [
        Self::UavLevelled,
        Self::RuntimeCalibration,
        Self::CpuLoad,
        Self::NavigationSafe,
        Self::CompassCalibrated,
        Self::AccelerometerCalibrated,
        Self::SettingsValidated,
        Self::HardwareHealth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UavLevelled => "uav_levelled",
            Self::RuntimeCalibration => "runtime_calibration",
            Self::CpuLoad => "cpu_load",
            Self::NavigationSafe => "navigation_safe",
            Self::CompassCalibrated => "compass_calibrated",
            Self::AccelerometerCalibrated => "accelerometer_calibrated",
            Self::SettingsValidated => "settings_validated",
            Self::HardwareHealth => "hardware_health",
        }
    }

    /// Position in the catalog; also the slot index inside a `CheckSet`.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn definition(&self) -> &'static CheckDefinition {
        &CATALOG[self.index()]
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckId {
    type Err = PrearmError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == value)
            .ok_or_else(|| PrearmError::UnknownCheck(value.to_string()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckDefinition {
    pub id: CheckId,
    pub name: &'static str,
    pub description: &'static str,
    pub rule: CheckRule,
}

pub static CATALOG: [CheckDefinition; CHECK_COUNT] = [
    CheckDefinition {
        id: CheckId::UavLevelled,
        name: "UAV is Levelled",
        description: "Drone is level within acceptable tolerance",
        rule: CheckRule::Attitude { tolerance_deg: 5.0 },
    },
    CheckDefinition {
        id: CheckId::RuntimeCalibration,
        name: "Run-time Calibration",
        description: "System calibration is complete and valid",
        rule: CheckRule::Flag {
            key: "calibration_valid",
            pass_message: "Run-time calibration complete",
            fail_message: "Run-time calibration required",
        },
    },
    CheckDefinition {
        id: CheckId::CpuLoad,
        name: "CPU Load",
        description: "CPU usage is within acceptable limits",
        rule: CheckRule::Load {
            key: "cpu_load",
            max_load: 80,
        },
    },
    CheckDefinition {
        id: CheckId::NavigationSafe,
        name: "Navigation is Safe",
        description: "GPS lock and navigation system operational",
        rule: CheckRule::SatelliteFix { min_satellites: 6 },
    },
    CheckDefinition {
        id: CheckId::CompassCalibrated,
        name: "Compass Calibrated",
        description: "Compass calibration is valid and recent",
        rule: CheckRule::CalibrationAge {
            subject: "Compass",
            flag_key: "compass_calibrated",
            age_key: "calibration_age_days",
            max_age_days: 30,
        },
    },
    CheckDefinition {
        id: CheckId::AccelerometerCalibrated,
        name: "Accelerometer Calibrated",
        description: "Accelerometer calibration is valid",
        rule: CheckRule::Flag {
            key: "accelerometer_calibrated",
            pass_message: "Accelerometer calibrated",
            fail_message: "Accelerometer calibration required",
        },
    },
    CheckDefinition {
        id: CheckId::SettingsValidated,
        name: "Settings Validated",
        description: "All system settings are within safe parameters",
        rule: CheckRule::Flag {
            key: "settings_valid",
            pass_message: "All settings validated",
            fail_message: "Settings validation failed",
        },
    },
    CheckDefinition {
        id: CheckId::HardwareHealth,
        name: "Hardware Health",
        description: "All hardware components are functioning properly",
        rule: CheckRule::Subsystems {
            subsystems: &[
                Subsystem {
                    name: "battery",
                    key: "battery_ok",
                },
                Subsystem {
                    name: "motors",
                    key: "motors_ok",
                },
                Subsystem {
                    name: "sensors",
                    key: "sensors_ok",
                },
            ],
        },
    },
];

pub fn lookup(key: &str) -> Result<&'static CheckDefinition, PrearmError> {
    key.parse::<CheckId>().map(|id| id.definition())
}

pub fn all_ids() -> impl Iterator<Item = CheckId> {
    CATALOG.iter().map(|definition| definition.id)
}
