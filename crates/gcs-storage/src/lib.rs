use async_trait::async_trait;
use gcs_core::{Mission, MissionId};
use thiserror::Error;

mod memory;
pub use memory::MemoryMissionRepository;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct StorageError {
    pub message: String,
}

/// Persistence boundary for mission records.
#[async_trait]
pub trait MissionRepository: Send + Sync {
    async fn get(&self, id: MissionId) -> Result<Option<Mission>, StorageError>;
    /// Newest first.
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Mission>, StorageError>;
    /// Stores `mission` unless the stored record has an equal or higher
    /// revision. Returns whether the write was applied.
    async fn upsert(&self, mission: Mission) -> Result<bool, StorageError>;
}
