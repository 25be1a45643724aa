// Domain layer: fleet entities, geo math and the ports the map core talks through.

pub mod entities;
pub mod errors;
pub mod format;
pub mod geo;
pub mod ports;
pub mod surface;
pub mod tuning;

pub use entities::{
    GeoZone, LngLat, PositionUpdate, Route, Task, Tracker, TrackerState, TrackerStatus, Waypoint,
    ZoneOrigin,
};
pub use errors::{DataSourceError, SurfaceError};
