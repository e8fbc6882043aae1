//! Mission lifecycle gated by pre-arm checks.

pub mod board;
pub mod error;
pub mod event;

pub use board::MissionBoard;
pub use error::ArmingError;
pub use event::{MissionEvent, Transition};
