// Value types exchanged with the rendering surface and its attached controls.

use super::entities::LngLat;
use super::geo::Bounds;
use std::time::Duration;

/// Source provided by the base map style rather than by the application.
pub const BASE_STYLE_SOURCE: &str = "composite";

/// GeoJSON-style polygon feature; `zone_id` travels as feature metadata so
/// pointer events on the primitive can be resolved back to the zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneFeature {
    pub zone_id: String,
    pub name: String,
    pub ring: Vec<LngLat>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceSpec {
    pub id: String,
    pub feature: ZoneFeature,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Fill { color: String, opacity: f64 },
    Line { color: String, width: f64 },
    Extrusion { color: String, opacity: f64, min_zoom: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: String,
    pub source: String,
    pub paint: Paint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Click,
    Enter,
    Leave,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    Layer(String),
    Marker(String),
}

/// Pointer interaction reported by the surface. `feature_id` carries the
/// `id` property of the feature under the pointer, when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    pub target: PointerTarget,
    pub kind: PointerEventKind,
    pub feature_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Pointer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerIcon {
    Photo(String),
    Color(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub id: String,
    pub position: LngLat,
    pub label: String,
    pub icon: MarkerIcon,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    pub bounds: Bounds,
    pub padding: f64,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyTo {
    pub pitch: f64,
    pub bearing: f64,
    pub duration: Duration,
}

/// External controls the core attaches to and detaches from the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Draw,
    Geocoder,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawnGeometry {
    Polygon(Vec<Vec<LngLat>>),
    LineString(Vec<LngLat>),
    Point(LngLat),
}

/// Result delivered by the geocode control's "result found" event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodeResult {
    pub place_name: Option<String>,
    /// `(min_lng, min_lat, max_lng, max_lat)`
    pub bbox: Option<[f64; 4]>,
}
