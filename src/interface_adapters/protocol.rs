// Wire DTOs: fixture payloads (camelCase JSON) and operator commands (tagged NDJSON).

use crate::domain::geo::close_ring;
use crate::domain::surface::{DrawnGeometry, GeocodeResult, PointerEvent, PointerEventKind, PointerTarget};
use crate::domain::{
    DataSourceError, GeoZone, LngLat, Route, Task, Tracker, TrackerState, TrackerStatus, Waypoint,
    ZoneOrigin,
};
use crate::use_cases::MapCommand;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CoordinatesDto {
    pub lat: f64,
    pub lng: f64,
}

impl From<CoordinatesDto> for LngLat {
    fn from(c: CoordinatesDto) -> Self {
        LngLat::new(c.lng, c.lat)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerStatusDto {
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerStateDto {
    Moving,
    Stopped,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerDto {
    pub id: String,
    pub name: String,
    pub coordinates: CoordinatesDto,
    pub status: TrackerStatusDto,
    pub state: TrackerStateDto,
    pub last_update: DateTime<Utc>,
    #[serde(default)]
    pub speed: Option<u32>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl From<TrackerDto> for Tracker {
    fn from(dto: TrackerDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            coordinates: dto.coordinates.into(),
            status: match dto.status {
                TrackerStatusDto::Online => TrackerStatus::Online,
                TrackerStatusDto::Offline => TrackerStatus::Offline,
            },
            state: match dto.state {
                TrackerStateDto::Moving => TrackerState::Moving,
                TrackerStateDto::Stopped => TrackerState::Stopped,
            },
            last_update: dto.last_update,
            speed: dto.speed,
            color: dto.color,
            photo: dto.photo,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoZoneDto {
    pub id: String,
    pub name: String,
    /// `[lng, lat]` pairs.
    pub coordinates: Vec<[f64; 2]>,
    pub visible: bool,
    pub color: String,
    #[serde(default)]
    pub border_color: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<GeoZoneDto> for GeoZone {
    type Error = DataSourceError;

    fn try_from(dto: GeoZoneDto) -> Result<Self, Self::Error> {
        let ring = close_ring(to_points(&dto.coordinates)).ok_or_else(|| {
            DataSourceError::Invalid(format!("zone `{}` has fewer than three distinct points", dto.id))
        })?;

        Ok(Self {
            id: dto.id,
            name: dto.name,
            ring,
            visible: dto.visible,
            fill_color: dto.color,
            border_color: dto.border_color,
            origin: ZoneOrigin::Fetched,
            created_at: dto.created_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub geo_zone_id: String,
    pub tracker_id: String,
    pub address: String,
    pub coordinates: CoordinatesDto,
    pub deadline: NaiveDateTime,
    pub required: bool,
    pub created_at: NaiveDateTime,
}

impl From<TaskDto> for Task {
    fn from(dto: TaskDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            comment: dto.comment,
            geo_zone_id: dto.geo_zone_id,
            tracker_id: dto.tracker_id,
            address: dto.address,
            coordinates: dto.coordinates.into(),
            deadline: dto.deadline,
            required: dto.required,
            created_at: dto.created_at,
        }
    }
}

/// Route waypoint on the wire: `(lng, lat, altitude, label)`.
pub type WaypointDto = (f64, f64, f64, String);

pub fn route_from_dto(points: Vec<WaypointDto>) -> Route {
    Route::new(
        points
            .into_iter()
            .map(|(lng, lat, altitude, label)| Waypoint {
                position: LngLat::new(lng, lat),
                altitude,
                label,
            })
            .collect(),
    )
}

fn to_points(pairs: &[[f64; 2]]) -> Vec<LngLat> {
    pairs.iter().map(|[lng, lat]| LngLat::new(*lng, *lat)).collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResultDto {
    #[serde(default)]
    pub place_name: Option<String>,
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
}

impl From<GeocodeResultDto> for GeocodeResult {
    fn from(dto: GeocodeResultDto) -> Self {
        Self {
            place_name: dto.place_name,
            bbox: dto.bbox,
        }
    }
}

/// Messages the operator sends, one JSON object per line.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OperatorMessage {
    ToggleDrawMode,
    ToggleSmartZoneMode,
    ExitEditMode,
    // Polygon ring the draw tool finished, `[lng, lat]` pairs.
    DrawComplete { ring: Vec<[f64; 2]> },
    GeocodeResult(GeocodeResultDto),
    ConfirmZoneName { name: String },
    ToggleZoneVisibility { id: String },
    DeleteZone { id: String },
    SelectZone { id: String },
    CenterOnZone { id: String },
    SelectTracker { id: String },
    SetTrackerColor { id: String, color: String },
    SetTrackerPhoto { id: String, photo: String },
    RemoveTrackerPhoto { id: String },
    AddTask(TaskDto),
    SelectTask { id: String },
    DeleteTask { id: String },
    ToggleFollow,
    Toggle3D,
    ClickLayer { layer_id: String },
    ClickMarker { marker_id: String },
    Shutdown,
}

impl From<OperatorMessage> for MapCommand {
    fn from(message: OperatorMessage) -> Self {
        match message {
            OperatorMessage::ToggleDrawMode => MapCommand::ToggleDrawMode,
            OperatorMessage::ToggleSmartZoneMode => MapCommand::ToggleSmartZoneMode,
            OperatorMessage::ExitEditMode => MapCommand::ExitEditMode,
            OperatorMessage::DrawComplete { ring } => MapCommand::DrawComplete {
                drawn: Some(DrawnGeometry::Polygon(vec![to_points(&ring)])),
            },
            OperatorMessage::GeocodeResult(result) => MapCommand::GeocodeResult(result.into()),
            OperatorMessage::ConfirmZoneName { name } => MapCommand::ConfirmZoneName { name },
            OperatorMessage::ToggleZoneVisibility { id } => MapCommand::ToggleZoneVisibility { id },
            OperatorMessage::DeleteZone { id } => MapCommand::DeleteZone { id },
            OperatorMessage::SelectZone { id } => MapCommand::SelectZone { id },
            OperatorMessage::CenterOnZone { id } => MapCommand::CenterOnZone { id },
            OperatorMessage::SelectTracker { id } => MapCommand::SelectTracker { id },
            OperatorMessage::SetTrackerColor { id, color } => {
                MapCommand::SetTrackerColor { id, color }
            }
            OperatorMessage::SetTrackerPhoto { id, photo } => {
                MapCommand::SetTrackerPhoto { id, photo }
            }
            OperatorMessage::RemoveTrackerPhoto { id } => MapCommand::RemoveTrackerPhoto { id },
            OperatorMessage::AddTask(task) => MapCommand::AddTask(task.into()),
            OperatorMessage::SelectTask { id } => MapCommand::SelectTask { id },
            OperatorMessage::DeleteTask { id } => MapCommand::DeleteTask { id },
            OperatorMessage::ToggleFollow => MapCommand::ToggleFollow,
            OperatorMessage::Toggle3D => MapCommand::Toggle3D,
            OperatorMessage::ClickLayer { layer_id } => MapCommand::Pointer(PointerEvent {
                target: PointerTarget::Layer(layer_id),
                kind: PointerEventKind::Click,
                feature_id: None,
            }),
            OperatorMessage::ClickMarker { marker_id } => MapCommand::Pointer(PointerEvent {
                target: PointerTarget::Marker(marker_id),
                kind: PointerEventKind::Click,
                feature_id: None,
            }),
            OperatorMessage::Shutdown => MapCommand::Shutdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_unit_command_has_no_data_then_it_decodes() {
        let message: OperatorMessage =
            serde_json::from_str(r#"{"type":"Toggle3D"}"#).expect("valid message");

        assert_eq!(MapCommand::from(message), MapCommand::Toggle3D);
    }

    #[test]
    fn when_geocode_result_lacks_place_name_then_it_is_optional() {
        let message: OperatorMessage = serde_json::from_str(
            r#"{"type":"GeocodeResult","data":{"bbox":[10.0,20.0,12.0,22.0]}}"#,
        )
        .expect("valid message");

        assert_eq!(
            MapCommand::from(message),
            MapCommand::GeocodeResult(GeocodeResult {
                place_name: None,
                bbox: Some([10.0, 20.0, 12.0, 22.0]),
            })
        );
    }

    #[test]
    fn when_draw_completes_then_ring_becomes_drawn_polygon() {
        let message: OperatorMessage = serde_json::from_str(
            r#"{"type":"DrawComplete","data":{"ring":[[0,0],[1,0],[1,1],[0,1],[0,0]]}}"#,
        )
        .expect("valid message");

        let MapCommand::DrawComplete {
            drawn: Some(DrawnGeometry::Polygon(rings)),
        } = MapCommand::from(message)
        else {
            panic!("expected a drawn polygon");
        };
        assert_eq!(rings[0].len(), 5);
        assert_eq!(rings[0][1], LngLat::new(1.0, 0.0));
    }

    #[test]
    fn when_task_form_is_submitted_then_it_becomes_an_add_task_command() {
        let message: OperatorMessage = serde_json::from_str(
            r#"{"type":"AddTask","data":{"id":"t9","name":"Drop-off","description":"Parcel",
                "geoZoneId":"1","trackerId":"2","address":"Tverskaya 7",
                "coordinates":{"lat":55.75,"lng":37.61},"deadline":"2025-05-03T18:00:00",
                "required":true,"createdAt":"2025-05-01T09:00:00"}}"#,
        )
        .expect("valid message");

        let MapCommand::AddTask(task) = MapCommand::from(message) else {
            panic!("expected a new task");
        };
        assert_eq!(task.tracker_id, "2");
        assert_eq!(task.comment, None);
        assert_eq!(task.coordinates, LngLat::new(37.61, 55.75));
        assert!(task.required);
    }

    #[test]
    fn when_layer_is_clicked_then_pointer_event_carries_no_feature() {
        let message: OperatorMessage = serde_json::from_str(
            r#"{"type":"ClickLayer","data":{"layer_id":"geozone-fill-1"}}"#,
        )
        .expect("valid message");

        assert_eq!(
            MapCommand::from(message),
            MapCommand::Pointer(PointerEvent {
                target: PointerTarget::Layer("geozone-fill-1".into()),
                kind: PointerEventKind::Click,
                feature_id: None,
            })
        );
    }

    #[test]
    fn when_zone_ring_is_open_then_conversion_closes_it() {
        let dto: GeoZoneDto = serde_json::from_str(
            r##"{"id":"1","name":"Center","coordinates":[[0,0],[1,0],[1,1]],
                "visible":true,"color":"#f00","createdAt":"2023-05-10T10:00:00Z"}"##,
        )
        .expect("valid zone");

        let zone = GeoZone::try_from(dto).expect("closable ring");

        assert_eq!(zone.ring.len(), 4);
        assert_eq!(zone.ring.first(), zone.ring.last());
        assert_eq!(zone.origin, ZoneOrigin::Fetched);
        assert_eq!(zone.border_color, None);
    }

    #[test]
    fn when_zone_has_too_few_points_then_conversion_fails() {
        let dto: GeoZoneDto = serde_json::from_str(
            r##"{"id":"1","name":"Line","coordinates":[[0,0],[1,0]],
                "visible":true,"color":"#f00","createdAt":"2023-05-10T10:00:00Z"}"##,
        )
        .expect("valid zone");

        assert!(matches!(
            GeoZone::try_from(dto),
            Err(DataSourceError::Invalid(_))
        ));
    }
}
