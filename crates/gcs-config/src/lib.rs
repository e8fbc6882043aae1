use serde::{Deserialize, Serialize};
use std::{env, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Local,
    Dev,
    Test,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_env(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "local" => Self::Local,
            "dev" | "development" => Self::Dev,
            "test" | "testing" => Self::Test,
            "staging" => Self::Staging,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Local => "local",
            Self::Dev => "dev",
            Self::Test => "test",
            Self::Staging => "staging",
            Self::Prod => "prod",
        };
        write!(f, "{}", value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub environment: Environment,
    pub region: Option<String>,
    pub bind_addr: String,
    pub metrics_addr: Option<String>,
    pub log_level: String,
    /// Capacity of the mission event channel feeding stream subscribers.
    pub event_buffer: usize,
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_EVENT_BUFFER: usize = 64;

impl ServiceConfig {
    pub fn from_env(default_service_name: &str) -> Self {
        Self::from_lookup(default_service_name, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(default_service_name: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let event_buffer = lookup("GCS_EVENT_BUFFER")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_EVENT_BUFFER);

        Self {
            service_name: var("GCS_SERVICE_NAME", default_service_name),
            environment: Environment::from_env(&var("GCS_ENV", "local")),
            region: lookup("GCS_REGION"),
            bind_addr: var("GCS_BIND_ADDR", DEFAULT_BIND_ADDR),
            metrics_addr: lookup("GCS_METRICS_ADDR"),
            log_level: var("GCS_LOG_LEVEL", "info"),
            event_buffer,
        }
    }
}
