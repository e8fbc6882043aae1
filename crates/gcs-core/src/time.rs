use chrono::{DateTime, Utc};

/// Wall-clock instant, always UTC. Serialized as RFC 3339.
pub type Timestamp = DateTime<Utc>;

pub fn now_utc() -> Timestamp {
    Utc::now()
}
