use async_trait::async_trait;
use gcs_core::{Mission, MissionId};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::RwLock;

use crate::{MissionRepository, StorageError};

/// Process-local repository; records vanish on restart.
#[derive(Debug, Default)]
pub struct MemoryMissionRepository {
    missions: RwLock<HashMap<MissionId, Mission>>,
}

impl MemoryMissionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MissionRepository for MemoryMissionRepository {
    async fn get(&self, id: MissionId) -> Result<Option<Mission>, StorageError> {
        Ok(self.missions.read().await.get(&id).cloned())
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Mission>, StorageError> {
        let mut missions: Vec<Mission> = self.missions.read().await.values().cloned().collect();
        missions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(missions.into_iter().skip(offset).take(limit).collect())
    }

    async fn upsert(&self, mission: Mission) -> Result<bool, StorageError> {
        let mut missions = self.missions.write().await;
        match missions.entry(mission.id) {
            Entry::Occupied(mut entry) => {
                if !mission.is_newer_than(entry.get()) {
                    return Ok(false);
                }
                entry.insert(mission);
            }
            Entry::Vacant(entry) => {
                entry.insert(mission);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcs_core::{now_utc, MissionDraft, MissionStatus};

    fn mission(name: &str) -> Mission {
        MissionDraft {
            name: name.to_string(),
            sector: None,
            duration: "10 min".to_string(),
        }
        .into_mission(now_utc())
        .unwrap()
    }

    #[tokio::test]
    async fn upsert_replaces_record() {
        let repo = MemoryMissionRepository::new();
        let mut record = mission("Harbour");
        assert!(repo.upsert(record.clone()).await.unwrap());

        record.status = MissionStatus::Armed;
        record.revision = 1;
        assert!(repo.upsert(record.clone()).await.unwrap());

        let stored = repo.get(record.id).await.unwrap().unwrap();
        assert_eq!(stored.status, MissionStatus::Armed);
        assert_eq!(repo.list(10, 0).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_pages_newest_first() {
        let repo = MemoryMissionRepository::new();
        let older = mission("Older");
        let mut newer = mission("Newer");
        newer.created_at = older.created_at + chrono::Duration::seconds(5);
        repo.upsert(older.clone()).await.unwrap();
        repo.upsert(newer.clone()).await.unwrap();

        let page = repo.list(1, 0).await.unwrap();
        assert_eq!(page[0].id, newer.id);
        let page = repo.list(10, 1).await.unwrap();
        assert_eq!(page[0].id, older.id);
    }

    #[tokio::test]
    async fn stale_revision_is_ignored() {
        let repo = MemoryMissionRepository::new();
        let created = mission("Estuary");
        let mut armed = created.clone();
        armed.status = MissionStatus::Armed;
        armed.revision = 1;
        let mut started = armed.clone();
        started.status = MissionStatus::InProgress;
        started.revision = 2;

        assert!(repo.upsert(started.clone()).await.unwrap());
        assert!(!repo.upsert(armed).await.unwrap());
        assert!(!repo.upsert(created).await.unwrap());
        assert!(!repo.upsert(started.clone()).await.unwrap());

        let stored = repo.get(started.id).await.unwrap().unwrap();
        assert_eq!(stored.status, MissionStatus::InProgress);
        assert_eq!(stored.revision, 2);
    }
}
