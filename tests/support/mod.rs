// Shared fakes and builders for the integration tests.
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracker_map::domain::ports::{Clock, PositionSink};
use tracker_map::domain::tuning::Tuning;
use tracker_map::domain::{GeoZone, LngLat, PositionUpdate, ZoneOrigin};
use tracker_map::interface_adapters::controls::{
    HeadlessDrawTool, HeadlessGeocoder, LoggingNamingDialog,
};
use tracker_map::interface_adapters::fixtures::FixtureDataSource;
use tracker_map::interface_adapters::headless::HeadlessSurface;
use tracker_map::use_cases::{MapSession, SessionPorts};

pub const NOW_MILLIS: i64 = 1_700_000_000_000;

// Clock frozen at `NOW_MILLIS`.
#[derive(Clone, Copy)]
pub struct FrozenClock;

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(NOW_MILLIS).expect("valid timestamp")
    }
}

// Sink that keeps every published position.
#[derive(Clone, Default)]
pub struct CollectingSink {
    updates: Arc<Mutex<Vec<PositionUpdate>>>,
}

impl CollectingSink {
    pub fn updates(&self) -> Vec<PositionUpdate> {
        self.updates.lock().expect("sink mutex poisoned").clone()
    }
}

impl PositionSink for CollectingSink {
    fn publish(&self, _tracker_id: &str, update: PositionUpdate) {
        self.updates.lock().expect("sink mutex poisoned").push(update);
    }
}

pub fn square_ring() -> Vec<LngLat> {
    [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]
        .into_iter()
        .map(LngLat::from)
        .collect()
}

pub fn visible_zone(id: &str) -> GeoZone {
    GeoZone {
        id: id.to_string(),
        name: format!("Zone {id}"),
        ring: square_ring(),
        visible: true,
        fill_color: "rgba(33, 150, 243, 0.3)".to_string(),
        border_color: None,
        origin: ZoneOrigin::Fetched,
        created_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

pub type HeadlessSession = MapSession<
    HeadlessSurface,
    HeadlessDrawTool,
    HeadlessGeocoder,
    LoggingNamingDialog,
    FrozenClock,
>;

pub struct Harness {
    pub surface: HeadlessSurface,
    pub draw: HeadlessDrawTool,
    pub dialog: LoggingNamingDialog,
    pub session: HeadlessSession,
}

// Session over the embedded fixtures, already loaded.
pub async fn loaded_session() -> Harness {
    let surface = HeadlessSurface::new();
    let draw = HeadlessDrawTool::new();
    let dialog = LoggingNamingDialog::new();
    let mut session = MapSession::new(
        SessionPorts {
            surface: surface.clone(),
            draw: draw.clone(),
            geocoder: HeadlessGeocoder::new(),
            dialog: dialog.clone(),
            clock: FrozenClock,
        },
        Tuning::default(),
    );
    session
        .load(&FixtureDataSource::embedded(Duration::ZERO))
        .await;

    Harness {
        surface,
        draw,
        dialog,
        session,
    }
}
