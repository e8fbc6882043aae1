pub mod domain;
pub mod error;
pub mod ids;
pub mod time;

pub use domain::{Mission, MissionDraft, MissionStatus};
pub use error::{ErrorCode, GcsError, GcsResult};
pub use ids::MissionId;
pub use time::{now_utc, Timestamp};
