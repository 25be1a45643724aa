// Mutually exclusive zone editing modes: freehand drawing and geocoded "smart zones".

use crate::domain::geo::{Bounds, close_ring};
use crate::domain::ports::{Clock, DrawTool, GeocodeTool, RenderSurface};
use crate::domain::surface::{ControlKind, DrawnGeometry, GeocodeResult};
use crate::domain::{GeoZone, LngLat, SurfaceError, ZoneOrigin};
use tracing::{debug, info, warn};

pub const DRAWN_FILL_COLOR: &str = "rgba(33, 150, 243, 0.3)";
pub const DRAWN_BORDER_COLOR: &str = "rgba(33, 150, 243, 0.8)";
pub const SMART_ZONE_FILL_COLOR: &str = "rgba(76, 175, 80, 0.3)";
pub const SMART_ZONE_BORDER_COLOR: &str = "rgba(76, 175, 80, 0.8)";
pub const SMART_ZONE_FALLBACK_NAME: &str = "Smart Zone";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Idle,
    Drawing,
    SmartZone,
}

/// Notifications for the zone collection owner, in the order they must be handled.
#[derive(Debug, Clone, PartialEq)]
pub enum EditEvent {
    /// A new zone is ready; drawn zones stay pending until named.
    ZoneProposed(GeoZone),
    /// The naming dialog should open for the pending zone.
    NameRequested,
}

pub struct EditModeMachine<S, D, G, C> {
    surface: S,
    draw: D,
    geocoder: G,
    clock: C,
    mode: EditMode,
    draw_attached: bool,
    geocoder_attached: bool,
    result_handler_registered: bool,
    pending: Option<GeoZone>,
}

impl<S, D, G, C> EditModeMachine<S, D, G, C>
where
    S: RenderSurface,
    D: DrawTool,
    G: GeocodeTool,
    C: Clock,
{
    pub fn new(surface: S, draw: D, geocoder: G, clock: C) -> Self {
        Self {
            surface,
            draw,
            geocoder,
            clock,
            mode: EditMode::Idle,
            draw_attached: false,
            geocoder_attached: false,
            result_handler_registered: false,
            pending: None,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn pending(&self) -> Option<&GeoZone> {
        self.pending.as_ref()
    }

    /// Switches to `mode`, leaving the other editing mode first.
    ///
    /// If the control for the new mode cannot be attached the machine falls
    /// back to `Idle` and the error is returned.
    pub fn activate(&mut self, mode: EditMode) -> Result<(), SurfaceError> {
        let entered = match mode {
            EditMode::Idle => {
                self.leave_drawing();
                self.leave_smart_zone();
                Ok(())
            }
            EditMode::Drawing => {
                self.leave_smart_zone();
                self.enter_drawing()
            }
            EditMode::SmartZone => {
                self.leave_drawing();
                self.enter_smart_zone()
            }
        };

        let previous = self.mode;
        self.mode = if entered.is_ok() { mode } else { EditMode::Idle };
        if previous != self.mode {
            info!(from = ?previous, to = ?self.mode, "edit mode changed");
        }
        entered
    }

    pub fn toggle_drawing(&mut self) -> Result<(), SurfaceError> {
        match self.mode {
            EditMode::Drawing => self.activate(EditMode::Idle),
            _ => self.activate(EditMode::Drawing),
        }
    }

    pub fn toggle_smart_zone(&mut self) -> Result<(), SurfaceError> {
        match self.mode {
            EditMode::SmartZone => self.activate(EditMode::Idle),
            _ => self.activate(EditMode::SmartZone),
        }
    }

    /// Leaves every editing mode and drops the unnamed pending zone.
    pub fn exit(&mut self) {
        // Entering Idle only detaches, which never fails.
        let _ = self.activate(EditMode::Idle);
        if let Some(zone) = self.pending.take() {
            debug!(zone_id = %zone.id, "pending zone discarded");
        }
    }

    /// Turns the first drawn polygon into a pending zone.
    ///
    /// `finished` is the shape the completion event carried; when present it
    /// replaces the draw tool's buffer, otherwise the buffer is read as is.
    /// The mode stays `Drawing` so the operator can keep drawing.
    pub fn on_draw_complete(&mut self, finished: Option<DrawnGeometry>) -> Vec<EditEvent> {
        if self.mode != EditMode::Drawing {
            debug!(mode = ?self.mode, "draw completion outside drawing mode ignored");
            return Vec::new();
        }
        if let Some(geometry) = finished {
            self.draw.set_drawn(vec![geometry]);
        }

        let Some(ring) = first_polygon_ring(self.draw.read_drawn()) else {
            warn!("drawn geometry has no usable polygon ring, ignoring");
            return Vec::new();
        };

        let zone = self.new_zone(ring, String::new(), ZoneOrigin::Drawn);
        self.draw.delete_all();
        self.pending = Some(zone.clone());
        info!(zone_id = %zone.id, points = zone.ring.len(), "zone drawn");

        vec![EditEvent::ZoneProposed(zone), EditEvent::NameRequested]
    }

    /// Turns a geocoder result's bounding box into a named smart zone.
    pub fn on_geocode_result(&mut self, result: GeocodeResult) -> Vec<EditEvent> {
        if self.mode != EditMode::SmartZone || !self.result_handler_registered {
            debug!(mode = ?self.mode, "geocode result outside smart zone mode ignored");
            return Vec::new();
        }

        let Some(bbox) = result.bbox else {
            warn!(place = ?result.place_name, "geocode result without bbox, ignoring");
            return Vec::new();
        };

        let name = result
            .place_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| SMART_ZONE_FALLBACK_NAME.to_string());
        let ring = Bounds::from_bbox(bbox).to_closed_ring();
        let zone = self.new_zone(ring, name, ZoneOrigin::SmartZone);
        info!(zone_id = %zone.id, name = %zone.name, "smart zone created");

        vec![EditEvent::ZoneProposed(zone)]
    }

    /// Names the pending zone and hands it over for committing.
    pub fn confirm_name(&mut self, name: impl Into<String>) -> Option<GeoZone> {
        let mut zone = self.pending.take()?;
        zone.name = name.into();
        Some(zone)
    }

    /// Detaches every control; used when the map view goes away.
    pub fn teardown(&mut self) {
        self.exit();
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn enter_drawing(&mut self) -> Result<(), SurfaceError> {
        if self.draw_attached {
            return Ok(());
        }
        self.surface.add_control(ControlKind::Draw)?;
        self.draw.hide_native_buttons();
        self.draw_attached = true;
        Ok(())
    }

    fn leave_drawing(&mut self) {
        if !self.draw_attached {
            return;
        }
        if let Err(error) = self.surface.remove_control(ControlKind::Draw) {
            warn!(%error, "failed to remove draw control");
        }
        self.draw_attached = false;
    }

    fn enter_smart_zone(&mut self) -> Result<(), SurfaceError> {
        if self.geocoder_attached {
            return Ok(());
        }
        self.surface.add_control(ControlKind::Geocoder)?;
        self.geocoder_attached = true;

        if !self.result_handler_registered {
            self.geocoder.register_result_handler();
            self.result_handler_registered = true;
        }
        Ok(())
    }

    fn leave_smart_zone(&mut self) {
        if !self.geocoder_attached {
            return;
        }
        if let Err(error) = self.surface.remove_control(ControlKind::Geocoder) {
            warn!(%error, "failed to remove geocoder control");
        }
        self.geocoder_attached = false;
    }

    fn new_zone(&self, ring: Vec<LngLat>, name: String, origin: ZoneOrigin) -> GeoZone {
        let now = self.clock.now();
        let (fill, border) = match origin {
            ZoneOrigin::SmartZone => (SMART_ZONE_FILL_COLOR, SMART_ZONE_BORDER_COLOR),
            ZoneOrigin::Drawn | ZoneOrigin::Fetched => (DRAWN_FILL_COLOR, DRAWN_BORDER_COLOR),
        };

        GeoZone {
            id: format!("gz-{}", now.timestamp_millis()),
            name,
            ring,
            visible: true,
            fill_color: fill.to_string(),
            border_color: Some(border.to_string()),
            origin,
            created_at: now,
        }
    }
}

fn first_polygon_ring(drawn: Vec<DrawnGeometry>) -> Option<Vec<LngLat>> {
    match drawn.into_iter().next()? {
        DrawnGeometry::Polygon(rings) => close_ring(rings.into_iter().next()?),
        _ => None,
    }
}
