// Tracker markers: one per stationary tracker plus the animated marker of the moving one.

use crate::domain::ports::RenderSurface;
use crate::domain::surface::{MarkerIcon, MarkerSpec, PointerEvent, PointerEventKind, PointerTarget};
use crate::domain::{LngLat, PositionUpdate, SurfaceError, Tracker, TrackerStatus};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const ONLINE_COLOR: &str = "#2ecc71";
pub const OFFLINE_COLOR: &str = "#e74c3c";
pub const MOVING_COLOR: &str = "#03A9F4";

/// Callback receiving the id of a clicked tracker.
pub type TrackerClickCallback = Box<dyn Fn(&str) + Send + Sync>;

pub fn marker_id(tracker_id: &str) -> String {
    format!("tracker-{tracker_id}")
}

/// Icon for a stationary tracker: photo, then custom color, then status color.
pub fn static_icon(tracker: &Tracker) -> MarkerIcon {
    if let Some(photo) = tracker.photo.as_ref().filter(|p| !p.is_empty()) {
        return MarkerIcon::Photo(photo.clone());
    }
    let color = tracker
        .color
        .clone()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| match tracker.status {
            TrackerStatus::Online => ONLINE_COLOR.to_string(),
            TrackerStatus::Offline => OFFLINE_COLOR.to_string(),
        });
    MarkerIcon::Color(color)
}

fn moving_icon(tracker: &Tracker) -> MarkerIcon {
    MarkerIcon::Color(
        tracker
            .color
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| MOVING_COLOR.to_string()),
    )
}

fn moving_label(name: &str, speed_kmh: u32) -> String {
    format!("{name} {speed_kmh} km/h")
}

struct MovingMarker {
    tracker_id: String,
    name: String,
    icon: MarkerIcon,
}

pub struct TrackerMarkers<S> {
    surface: S,
    // tracker id -> icon last applied
    placed: BTreeMap<String, MarkerIcon>,
    moving: Option<MovingMarker>,
    on_click: TrackerClickCallback,
}

impl<S> TrackerMarkers<S>
where
    S: RenderSurface,
{
    pub fn new(surface: S, on_click: TrackerClickCallback) -> Self {
        Self {
            surface,
            placed: BTreeMap::new(),
            moving: None,
            on_click,
        }
    }

    /// Adds a marker for every stationary tracker that has none yet.
    pub fn place(&mut self, trackers: &[Tracker]) {
        for tracker in trackers.iter().filter(|t| !t.is_moving()) {
            if self.placed.contains_key(&tracker.id) {
                continue;
            }
            let icon = static_icon(tracker);
            let spec = MarkerSpec {
                id: marker_id(&tracker.id),
                position: tracker.coordinates,
                label: tracker.name.clone(),
                icon: icon.clone(),
            };
            match self.surface.add_marker(spec) {
                Ok(()) => {
                    self.placed.insert(tracker.id.clone(), icon);
                }
                Err(error) => warn!(tracker_id = %tracker.id, %error, "failed to add tracker marker"),
            }
        }
    }

    /// Re-applies icons whose photo, color or status changed.
    pub fn restyle(&mut self, trackers: &[Tracker]) {
        for tracker in trackers {
            if let Some(applied) = self.placed.get_mut(&tracker.id) {
                let icon = static_icon(tracker);
                if *applied != icon {
                    match self.surface.set_marker_icon(&marker_id(&tracker.id), icon.clone()) {
                        Ok(()) => *applied = icon,
                        Err(error) => {
                            warn!(tracker_id = %tracker.id, %error, "failed to restyle marker")
                        }
                    }
                }
            }
        }

        let Some(moving) = self.moving.as_mut() else {
            return;
        };
        let Some(tracker) = trackers.iter().find(|t| t.id == moving.tracker_id) else {
            return;
        };
        let icon = moving_icon(tracker);
        if moving.icon != icon {
            match self.surface.set_marker_icon(&marker_id(&moving.tracker_id), icon.clone()) {
                Ok(()) => moving.icon = icon,
                Err(error) => warn!(%error, "failed to restyle moving marker"),
            }
        }
    }

    /// Places the moving tracker's marker at the start of its route.
    pub fn place_moving(&mut self, tracker: &Tracker, start: LngLat) -> Result<(), SurfaceError> {
        if self.moving.is_some() {
            return Ok(());
        }
        let icon = moving_icon(tracker);
        self.surface.add_marker(MarkerSpec {
            id: marker_id(&tracker.id),
            position: start,
            label: moving_label(&tracker.name, tracker.speed.unwrap_or(0)),
            icon: icon.clone(),
        })?;
        debug!(tracker_id = %tracker.id, "moving marker placed");
        self.moving = Some(MovingMarker {
            tracker_id: tracker.id.clone(),
            name: tracker.name.clone(),
            icon,
        });
        Ok(())
    }

    pub fn move_moving(&self, update: PositionUpdate) {
        let Some(moving) = &self.moving else {
            return;
        };
        let id = marker_id(&moving.tracker_id);
        if let Err(error) = self.surface.move_marker(&id, update.position()) {
            debug!(%error, "failed to move marker");
            return;
        }
        if let Err(error) = self
            .surface
            .set_marker_label(&id, &moving_label(&moving.name, update.speed_kmh))
        {
            debug!(%error, "failed to update speed label");
        }
    }

    /// Forwards clicks on owned markers to the click callback.
    pub fn handle_pointer(&self, event: &PointerEvent) -> bool {
        let PointerTarget::Marker(id) = &event.target else {
            return false;
        };
        if event.kind != PointerEventKind::Click {
            return false;
        }
        let owned = self
            .placed
            .keys()
            .chain(self.moving.as_ref().map(|m| &m.tracker_id))
            .find(|tracker_id| marker_id(tracker_id) == *id);

        match owned {
            Some(tracker_id) => {
                (self.on_click)(tracker_id);
                true
            }
            None => false,
        }
    }

    pub fn teardown(&mut self) {
        let ids: Vec<String> = std::mem::take(&mut self.placed)
            .into_keys()
            .chain(self.moving.take().map(|m| m.tracker_id))
            .collect();
        for tracker_id in ids {
            if let Err(error) = self.surface.remove_marker(&marker_id(&tracker_id)) {
                warn!(%tracker_id, %error, "failed to remove tracker marker");
            }
        }
    }

    pub fn placed_ids(&self) -> impl Iterator<Item = &str> {
        self.placed.keys().map(String::as_str)
    }

    pub fn moving_id(&self) -> Option<&str> {
        self.moving.as_ref().map(|m| m.tracker_id.as_str())
    }
}
