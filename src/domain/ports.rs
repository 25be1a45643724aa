use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{GeoZone, LngLat, PositionUpdate, Route, Task, Tracker};
use crate::domain::errors::{DataSourceError, SurfaceError};
use crate::domain::surface::{
    ControlKind, Cursor, DrawnGeometry, FitOptions, FlyTo, LayerSpec, MarkerIcon, MarkerSpec,
    Paint, PointerEventKind, SourceSpec, ZoneFeature,
};

// Port for the imperative map-rendering surface.
//
// Adding an id that exists or removing one that does not is an error; callers
// track what they own instead of relying on the surface to deduplicate.
pub trait RenderSurface: Send + Sync {
    fn add_source(&self, source: SourceSpec) -> Result<(), SurfaceError>;
    fn set_source_data(&self, source_id: &str, feature: ZoneFeature) -> Result<(), SurfaceError>;
    fn remove_source(&self, source_id: &str) -> Result<(), SurfaceError>;

    fn add_layer(&self, layer: LayerSpec) -> Result<(), SurfaceError>;
    fn set_paint(&self, layer_id: &str, paint: Paint) -> Result<(), SurfaceError>;
    fn remove_layer(&self, layer_id: &str) -> Result<(), SurfaceError>;
    fn has_layer(&self, layer_id: &str) -> bool;

    fn subscribe(&self, layer_id: &str, kind: PointerEventKind) -> Result<(), SurfaceError>;
    fn unsubscribe(&self, layer_id: &str, kind: PointerEventKind) -> Result<(), SurfaceError>;
    fn set_cursor(&self, cursor: Cursor) -> Result<(), SurfaceError>;

    fn fit_bounds(&self, options: FitOptions) -> Result<(), SurfaceError>;
    fn set_center(&self, center: LngLat) -> Result<(), SurfaceError>;
    fn fly_to(&self, target: FlyTo) -> Result<(), SurfaceError>;

    fn add_marker(&self, marker: MarkerSpec) -> Result<(), SurfaceError>;
    fn move_marker(&self, marker_id: &str, position: LngLat) -> Result<(), SurfaceError>;
    fn set_marker_icon(&self, marker_id: &str, icon: MarkerIcon) -> Result<(), SurfaceError>;
    fn set_marker_label(&self, marker_id: &str, label: &str) -> Result<(), SurfaceError>;
    fn remove_marker(&self, marker_id: &str) -> Result<(), SurfaceError>;

    fn add_control(&self, control: ControlKind) -> Result<(), SurfaceError>;
    fn remove_control(&self, control: ControlKind) -> Result<(), SurfaceError>;
}

// Port for the freehand draw control.
pub trait DrawTool: Send + Sync {
    fn read_drawn(&self) -> Vec<DrawnGeometry>;
    // Replace the whole buffer, like the control's own `set`.
    fn set_drawn(&self, drawn: Vec<DrawnGeometry>);
    fn delete_all(&self);
    // Hide the control's own buttons; the application drives drawing itself.
    fn hide_native_buttons(&self);
}

// Port for the geocode-search control. Results are delivered to the core as events.
pub trait GeocodeTool: Send + Sync {
    fn register_result_handler(&self);
}

// Port for the naming dialog collaborator.
pub trait NamingDialog: Send + Sync {
    fn request_open(&self, pending: &GeoZone);
}

// Port receiving interpolated positions of the moving tracker.
pub trait PositionSink: Send {
    fn publish(&self, tracker_id: &str, update: PositionUpdate);
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

// Port for the asynchronous fleet data source.
#[async_trait]
pub trait DomainDataSource: Send + Sync {
    async fn fetch_trackers(&self) -> Result<Vec<Tracker>, DataSourceError>;
    async fn fetch_geozones(&self) -> Result<Vec<GeoZone>, DataSourceError>;
    async fn fetch_tasks(&self) -> Result<Vec<Task>, DataSourceError>;
    async fn fetch_moving_route(&self) -> Result<Route, DataSourceError>;
}
