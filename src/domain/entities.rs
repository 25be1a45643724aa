// Domain-level fleet entities: trackers, zones, delivery tasks and recorded routes.

use chrono::{DateTime, NaiveDateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<(f64, f64)> for LngLat {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self { lng, lat }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerStatus {
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Moving,
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tracker {
    pub id: String,
    pub name: String,
    pub coordinates: LngLat,
    pub status: TrackerStatus,
    pub state: TrackerState,
    pub last_update: DateTime<Utc>,
    // Derived by the motion engine for the moving tracker, km/h.
    pub speed: Option<u32>,
    pub color: Option<String>,
    pub photo: Option<String>,
}

impl Tracker {
    pub fn is_moving(&self) -> bool {
        self.state == TrackerState::Moving
    }
}

/// Where a zone came from; drives the default styling of new zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneOrigin {
    Drawn,
    SmartZone,
    Fetched,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoZone {
    pub id: String,
    pub name: String,
    /// Closed ring: at least four points, first == last.
    pub ring: Vec<LngLat>,
    pub visible: bool,
    pub fill_color: String,
    pub border_color: Option<String>,
    pub origin: ZoneOrigin,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: String,
    pub comment: Option<String>,
    pub geo_zone_id: String,
    pub tracker_id: String,
    pub address: String,
    pub coordinates: LngLat,
    pub deadline: NaiveDateTime,
    pub required: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub position: LngLat,
    pub altitude: f64,
    pub label: String,
}

/// Ordered, immutable sequence of waypoints a simulated tracker travels along.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    waypoints: Vec<Waypoint>,
}

impl Route {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    /// Builds an unlabeled route from `(lng, lat)` pairs.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(
            points
                .into_iter()
                .map(|p| Waypoint {
                    position: p.into(),
                    altitude: 0.0,
                    label: String::new(),
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn position(&self, index: usize) -> Option<LngLat> {
        self.waypoints.get(index).map(|w| w.position)
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }
}

/// Interpolated position pushed to the state holder on every animated frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionUpdate {
    pub lat: f64,
    pub lng: f64,
    pub speed_kmh: u32,
}

impl PositionUpdate {
    pub fn position(&self) -> LngLat {
        LngLat::new(self.lng, self.lat)
    }
}
