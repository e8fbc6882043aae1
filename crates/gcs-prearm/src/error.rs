use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrearmError {
    #[error("Invalid check ID: {0}")]
    UnknownCheck(String),
}
