use gcs_config::ServiceConfig;
use gcs_core::Mission;
use gcs_mission::{MissionBoard, MissionEvent};
use gcs_prearm::CheckResultStore;
use gcs_storage::{MissionRepository, StorageError};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

const HYDRATE_PAGE: usize = 500;

pub struct AppState {
    pub config: ServiceConfig,
    pub board: MissionBoard,
    pub repository: Arc<dyn MissionRepository>,
    events: broadcast::Sender<MissionEvent>,
}

impl AppState {
    pub fn new(config: ServiceConfig, repository: Arc<dyn MissionRepository>) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer);
        Self {
            board: MissionBoard::new(Arc::new(CheckResultStore::new())),
            config,
            repository,
            events,
        }
    }

    pub fn checks(&self) -> &CheckResultStore {
        self.board.checks()
    }

    /// Loads persisted missions into the board.
    pub async fn hydrate(&self) -> Result<usize, StorageError> {
        let mut offset = 0;
        loop {
            let page = self.repository.list(HYDRATE_PAGE, offset).await?;
            let count = page.len();
            for mission in page {
                self.board.register(mission);
            }
            offset += count;
            if count < HYDRATE_PAGE {
                break;
            }
        }
        info!(missions = offset, "mission board hydrated");
        Ok(offset)
    }

    /// Writes through to the repository. The board stays authoritative when this fails.
    ///
    /// Writes race once the board lock is released; the repository keeps the
    /// highest revision, so a late stale write is dropped.
    pub async fn persist(&self, mission: &Mission) {
        match self.repository.upsert(mission.clone()).await {
            Ok(true) => {}
            Ok(false) => debug!(
                mission_id = %mission.id,
                revision = mission.revision,
                "skipped stale mission write"
            ),
            Err(err) => {
                error!(mission_id = %mission.id, error = %err, "failed to persist mission");
            }
        }
    }

    pub fn publish(&self, event: MissionEvent) {
        let name = event.name();
        let mission_id = event.mission_id;
        match self.events.send(event) {
            Ok(receivers) => {
                debug!(
                    event = name,
                    mission_id = %mission_id,
                    receivers,
                    "mission event published"
                );
            }
            Err(_) => {
                debug!(event = name, mission_id = %mission_id, "no event subscribers");
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MissionEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
pub fn test_state() -> AppState {
    use gcs_storage::MemoryMissionRepository;

    let config = ServiceConfig::from_lookup("gcs-api", |_| None);
    AppState::new(config, Arc::new(MemoryMissionRepository::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcs_core::{now_utc, MissionDraft, MissionStatus};
    use gcs_mission::ArmingError;
    use gcs_prearm::{CheckId, ReadingsByCheck, SensorReadings};
    use gcs_storage::MemoryMissionRepository;

    fn passing_readings() -> ReadingsByCheck {
        let mut readings = ReadingsByCheck::new()
            .with(
                CheckId::UavLevelled,
                SensorReadings::new().with("roll", 0).with("pitch", 0),
            )
            .with(CheckId::CpuLoad, SensorReadings::new().with("cpu_load", 10))
            .with(
                CheckId::NavigationSafe,
                SensorReadings::new()
                    .with("gps_fix", true)
                    .with("satellites", 10),
            )
            .with(
                CheckId::CompassCalibrated,
                SensorReadings::new()
                    .with("compass_calibrated", true)
                    .with("calibration_age_days", 1),
            )
            .with(
                CheckId::HardwareHealth,
                SensorReadings::new()
                    .with("battery_ok", true)
                    .with("motors_ok", true)
                    .with("sensors_ok", true),
            );
        for (check, key) in [
            (CheckId::RuntimeCalibration, "calibration_valid"),
            (CheckId::AccelerometerCalibrated, "accelerometer_calibrated"),
            (CheckId::SettingsValidated, "settings_valid"),
        ] {
            readings = readings.with(check, SensorReadings::new().with(key, true));
        }
        readings
    }

    #[actix_web::test]
    async fn late_armed_write_does_not_regress_after_restart() {
        let repository: Arc<dyn MissionRepository> = Arc::new(MemoryMissionRepository::new());
        let config = ServiceConfig::from_lookup("gcs-api", |_| None);
        let state = AppState::new(config.clone(), repository.clone());

        let mission = MissionDraft {
            name: "Reservoir edge".to_string(),
            sector: None,
            duration: "25 min".to_string(),
        }
        .into_mission(now_utc())
        .unwrap();
        let id = mission.id;
        state.board.register(mission.clone());
        state.persist(&mission).await;
        state.checks().upsert_all(id, &passing_readings());

        let armed = state.board.arm(id).unwrap();
        let started = state.board.start(id).unwrap();
        state.persist(&started).await;
        state.persist(&armed).await;

        let stored = repository.get(id).await.unwrap().unwrap();
        assert_eq!(stored.status, MissionStatus::InProgress);

        let restarted = AppState::new(config, repository);
        assert_eq!(restarted.hydrate().await.unwrap(), 1);
        assert_eq!(
            restarted.board.get(id).unwrap().status,
            MissionStatus::InProgress
        );
        assert_eq!(
            restarted.board.start(id).unwrap_err(),
            ArmingError::NotArmed {
                status: MissionStatus::InProgress
            }
        );
    }
}
