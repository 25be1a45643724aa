use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::domain::ports::{Clock, DomainDataSource, PositionSink};
use crate::domain::{
    DataSourceError, GeoZone, LngLat, PositionUpdate, Route, Task, Tracker, TrackerState,
    TrackerStatus, ZoneOrigin,
};

// Shared fixed time source for deterministic use-case tests.
#[derive(Clone, Copy)]
pub(crate) struct FixedClock(pub(crate) DateTime<Utc>);

impl FixedClock {
    pub(crate) fn at_millis(millis: i64) -> Self {
        Self(DateTime::<Utc>::from_timestamp_millis(millis).expect("valid timestamp"))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    updates: Arc<Mutex<Vec<(String, PositionUpdate)>>>,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn updates(&self) -> Vec<(String, PositionUpdate)> {
        self.updates.lock().expect("updates mutex poisoned").clone()
    }
}

impl PositionSink for RecordingSink {
    fn publish(&self, tracker_id: &str, update: PositionUpdate) {
        let mut guard = self.updates.lock().expect("updates mutex poisoned");
        guard.push((tracker_id.to_string(), update));
    }
}

// Collects ids forwarded through click callbacks.
#[derive(Clone, Default)]
pub(crate) struct ClickLog {
    ids: Arc<Mutex<Vec<String>>>,
}

impl ClickLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn callback(&self) -> Box<dyn Fn(&str) + Send + Sync> {
        let ids = Arc::clone(&self.ids);
        Box::new(move |id| {
            ids.lock().expect("clicks mutex poisoned").push(id.to_string());
        })
    }

    pub(crate) fn ids(&self) -> Vec<String> {
        self.ids.lock().expect("clicks mutex poisoned").clone()
    }
}

pub(crate) fn unit_square() -> Vec<LngLat> {
    vec![
        LngLat::new(0.0, 0.0),
        LngLat::new(1.0, 0.0),
        LngLat::new(1.0, 1.0),
        LngLat::new(0.0, 1.0),
        LngLat::new(0.0, 0.0),
    ]
}

pub(crate) fn zone(id: &str, visible: bool) -> GeoZone {
    GeoZone {
        id: id.to_string(),
        name: format!("Zone {id}"),
        ring: unit_square(),
        visible,
        fill_color: "rgba(33, 150, 243, 0.3)".to_string(),
        border_color: Some("#1976d2".to_string()),
        origin: ZoneOrigin::Fetched,
        created_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

pub(crate) fn tracker(id: &str, state: TrackerState) -> Tracker {
    Tracker {
        id: id.to_string(),
        name: format!("Tracker {id}"),
        coordinates: LngLat::new(37.6173, 55.7558),
        status: TrackerStatus::Online,
        state,
        last_update: DateTime::<Utc>::UNIX_EPOCH,
        speed: None,
        color: None,
        photo: None,
    }
}

pub(crate) fn task(id: &str, zone_id: &str, tracker_id: &str, required: bool) -> Task {
    let at = |d: u32| -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, d)
            .and_then(|date| date.and_hms_opt(18, 0, 0))
            .expect("valid date")
    };
    Task {
        id: id.to_string(),
        name: format!("Task {id}"),
        description: "Deliver the parcel".to_string(),
        comment: None,
        geo_zone_id: zone_id.to_string(),
        tracker_id: tracker_id.to_string(),
        address: "Tverskaya 7".to_string(),
        coordinates: LngLat::new(37.6173, 55.7558),
        deadline: at(3),
        required,
        created_at: at(1),
    }
}

// In-memory data source; `None` collections fail to simulate a broken backend.
#[derive(Clone, Default)]
pub(crate) struct StaticDataSource {
    pub(crate) trackers: Option<Vec<Tracker>>,
    pub(crate) zones: Option<Vec<GeoZone>>,
    pub(crate) tasks: Option<Vec<Task>>,
    pub(crate) route: Option<Route>,
}

fn or_unavailable<T: Clone>(value: &Option<T>, what: &str) -> Result<T, DataSourceError> {
    value
        .clone()
        .ok_or_else(|| DataSourceError::Invalid(format!("{what} unavailable")))
}

#[async_trait]
impl DomainDataSource for StaticDataSource {
    async fn fetch_trackers(&self) -> Result<Vec<Tracker>, DataSourceError> {
        or_unavailable(&self.trackers, "trackers")
    }

    async fn fetch_geozones(&self) -> Result<Vec<GeoZone>, DataSourceError> {
        or_unavailable(&self.zones, "geozones")
    }

    async fn fetch_tasks(&self) -> Result<Vec<Task>, DataSourceError> {
        or_unavailable(&self.tasks, "tasks")
    }

    async fn fetch_moving_route(&self) -> Result<Route, DataSourceError> {
        or_unavailable(&self.route, "route")
    }
}
