// Fixture-backed fleet data source with simulated network latency.

use super::protocol::{GeoZoneDto, TaskDto, TrackerDto, WaypointDto, route_from_dto};
use crate::domain::ports::DomainDataSource;
use crate::domain::{DataSourceError, GeoZone, Route, Task, Tracker};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

pub const TRACKERS_FILE: &str = "trackers.json";
pub const GEOZONES_FILE: &str = "geozones.json";
pub const TASKS_FILE: &str = "tasks.json";
pub const ROUTE_FILE: &str = "moving_route.json";

fn embedded(name: &str) -> Option<&'static str> {
    match name {
        TRACKERS_FILE => Some(include_str!("../../fixtures/trackers.json")),
        GEOZONES_FILE => Some(include_str!("../../fixtures/geozones.json")),
        TASKS_FILE => Some(include_str!("../../fixtures/tasks.json")),
        ROUTE_FILE => Some(include_str!("../../fixtures/moving_route.json")),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct FixtureDataSource {
    // None reads the fixtures compiled into the binary.
    dir: Option<PathBuf>,
    delay: Duration,
}

impl FixtureDataSource {
    pub fn embedded(delay: Duration) -> Self {
        Self { dir: None, delay }
    }

    pub fn from_dir(dir: impl Into<PathBuf>, delay: Duration) -> Self {
        Self {
            dir: Some(dir.into()),
            delay,
        }
    }

    async fn read(&self, name: &'static str) -> Result<String, DataSourceError> {
        tokio::time::sleep(self.delay).await;

        match &self.dir {
            None => embedded(name)
                .map(str::to_string)
                .ok_or_else(|| DataSourceError::Invalid(format!("no embedded fixture `{name}`"))),
            Some(dir) => {
                let path = dir.join(name);
                debug!(path = %path.display(), "reading fixture");
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| DataSourceError::Io {
                        path: path.display().to_string(),
                        source,
                    })
            }
        }
    }

    async fn decode<T>(&self, name: &'static str, what: &'static str) -> Result<T, DataSourceError>
    where
        T: DeserializeOwned,
    {
        let raw = self.read(name).await?;
        serde_json::from_str(&raw).map_err(|source| DataSourceError::Decode { what, source })
    }
}

#[async_trait]
impl DomainDataSource for FixtureDataSource {
    async fn fetch_trackers(&self) -> Result<Vec<Tracker>, DataSourceError> {
        let dtos: Vec<TrackerDto> = self.decode(TRACKERS_FILE, "trackers").await?;
        Ok(dtos.into_iter().map(Tracker::from).collect())
    }

    /// Zones whose ring cannot form a polygon are skipped.
    async fn fetch_geozones(&self) -> Result<Vec<GeoZone>, DataSourceError> {
        let dtos: Vec<GeoZoneDto> = self.decode(GEOZONES_FILE, "geozones").await?;
        Ok(dtos
            .into_iter()
            .filter_map(|dto| match GeoZone::try_from(dto) {
                Ok(zone) => Some(zone),
                Err(error) => {
                    warn!(%error, "skipping zone");
                    None
                }
            })
            .collect())
    }

    async fn fetch_tasks(&self) -> Result<Vec<Task>, DataSourceError> {
        let dtos: Vec<TaskDto> = self.decode(TASKS_FILE, "tasks").await?;
        Ok(dtos.into_iter().map(Task::from).collect())
    }

    async fn fetch_moving_route(&self) -> Result<Route, DataSourceError> {
        let points: Vec<WaypointDto> = self.decode(ROUTE_FILE, "moving route").await?;
        Ok(route_from_dto(points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TrackerState, TrackerStatus};

    fn source() -> FixtureDataSource {
        FixtureDataSource::embedded(Duration::ZERO)
    }

    #[tokio::test]
    async fn when_embedded_fixtures_are_read_then_one_tracker_is_moving() {
        let trackers = source().fetch_trackers().await.expect("trackers decode");

        assert_eq!(trackers.len(), 4);
        assert_eq!(
            trackers.iter().filter(|t| t.state == TrackerState::Moving).count(),
            1
        );
        assert_eq!(trackers[2].status, TrackerStatus::Offline);
    }

    #[tokio::test]
    async fn when_zones_are_read_then_every_ring_is_closed() {
        let zones = source().fetch_geozones().await.expect("zones decode");

        assert_eq!(zones.len(), 3);
        assert!(zones.iter().all(|z| z.ring.first() == z.ring.last()));
    }

    #[tokio::test]
    async fn when_tasks_and_route_are_read_then_they_decode() {
        let tasks = source().fetch_tasks().await.expect("tasks decode");
        let route = source().fetch_moving_route().await.expect("route decodes");

        assert_eq!(tasks.iter().filter(|t| t.required).count(), 2);
        assert_eq!(route.len(), 8);
        assert_eq!(route.waypoints()[0].label, "Arbat");
    }

    #[tokio::test]
    async fn when_fixture_dir_is_missing_then_io_error_names_the_file() {
        let source = FixtureDataSource::from_dir("/nonexistent/fixtures", Duration::ZERO);

        let error = source.fetch_tasks().await.expect_err("missing dir");

        assert!(matches!(error, DataSourceError::Io { ref path, .. } if path.ends_with(TASKS_FILE)));
    }
}
