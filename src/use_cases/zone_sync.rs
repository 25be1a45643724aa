// Keeps the zone layers on the rendering surface consistent with the zone collection.

use crate::domain::geo::Bounds;
use crate::domain::ports::RenderSurface;
use crate::domain::surface::{
    Cursor, FitOptions, LayerSpec, Paint, PointerEvent, PointerEventKind, PointerTarget,
    SourceSpec, ZoneFeature,
};
use crate::domain::tuning::ZoneTuning;
use crate::domain::{GeoZone, SurfaceError};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

pub const DEFAULT_FILL_COLOR: &str = "rgba(33, 150, 243, 0.25)";
pub const DEFAULT_BORDER_COLOR: &str = "rgba(33, 150, 243, 0.8)";

const FILL_EVENTS: [PointerEventKind; 3] = [
    PointerEventKind::Click,
    PointerEventKind::Enter,
    PointerEventKind::Leave,
];

pub fn source_id(zone_id: &str) -> String {
    format!("geozone-{zone_id}")
}

pub fn fill_layer_id(zone_id: &str) -> String {
    format!("geozone-fill-{zone_id}")
}

pub fn outline_layer_id(zone_id: &str) -> String {
    format!("geozone-outline-{zone_id}")
}

/// Callback receiving the id of a clicked zone.
pub type ZoneClickCallback = Box<dyn Fn(&str) + Send + Sync>;

// Surface handles owned for one visible zone, plus what was last applied to them.
#[derive(Debug, Clone, PartialEq)]
struct ZoneHandles {
    source_id: String,
    fill_layer_id: String,
    outline_layer_id: String,
    feature: ZoneFeature,
    fill: Paint,
    outline: Paint,
}

/// Diff-based synchronizer between a zone collection and drawable layers.
///
/// After every [`ZoneSynchronizer::synchronize`] the set of owned handles is
/// exactly the set of visible zone ids. Calling it again with the same input
/// issues no surface calls at all.
pub struct ZoneSynchronizer<S> {
    surface: S,
    tuning: ZoneTuning,
    handles: BTreeMap<String, ZoneHandles>,
    bounds: HashMap<String, Bounds>,
    on_click: ZoneClickCallback,
}

impl<S> ZoneSynchronizer<S>
where
    S: RenderSurface,
{
    pub fn new(surface: S, tuning: ZoneTuning, on_click: ZoneClickCallback) -> Self {
        Self {
            surface,
            tuning,
            handles: BTreeMap::new(),
            bounds: HashMap::new(),
            on_click,
        }
    }

    pub fn synchronize(&mut self, zones: &[GeoZone]) {
        self.bounds = zones
            .iter()
            .filter_map(|z| Bounds::enclosing(&z.ring).map(|b| (z.id.clone(), b)))
            .collect();

        let desired: BTreeMap<&str, &GeoZone> = zones
            .iter()
            .filter(|z| z.visible)
            .map(|z| (z.id.as_str(), z))
            .collect();

        let stale: Vec<String> = self
            .handles
            .keys()
            .filter(|id| !desired.contains_key(id.as_str()))
            .cloned()
            .collect();
        for zone_id in stale {
            if let Some(handles) = self.handles.remove(&zone_id) {
                self.release(&zone_id, &handles);
            }
        }

        for (zone_id, zone) in desired {
            let feature = feature_for(zone);
            let (fill, outline) = self.paints_for(zone);

            match self.handles.get_mut(zone_id) {
                Some(handles) => {
                    update_handles(&self.surface, handles, feature, fill, outline);
                }
                None => match create_handles(&self.surface, zone_id, feature, fill, outline) {
                    Ok(handles) => {
                        debug!(zone_id, "zone layers added");
                        self.handles.insert(zone_id.to_string(), handles);
                    }
                    Err(error) => {
                        warn!(zone_id, %error, "failed to add zone layers");
                    }
                },
            }
        }
    }

    /// Fits the camera to the zone's ring. Unknown ids are ignored.
    pub fn center_on(&self, zone_id: &str) {
        let Some(bounds) = self.bounds.get(zone_id).copied() else {
            debug!(zone_id, "center requested for unknown zone");
            return;
        };

        let options = FitOptions {
            bounds,
            padding: self.tuning.fit_padding,
            duration: self.tuning.fit_duration,
        };
        if let Err(error) = self.surface.fit_bounds(options) {
            warn!(zone_id, %error, "failed to fit zone bounds");
        }
    }

    /// Handles hover and click on owned fill layers.
    ///
    /// Returns false when the event does not target a zone fill.
    pub fn handle_pointer(&self, event: &PointerEvent) -> bool {
        let PointerTarget::Layer(layer_id) = &event.target else {
            return false;
        };
        let Some(owner) = self
            .handles
            .iter()
            .find(|(_, h)| &h.fill_layer_id == layer_id)
            .map(|(zone_id, _)| zone_id.as_str())
        else {
            return false;
        };

        match event.kind {
            PointerEventKind::Enter => self.set_cursor(Cursor::Pointer),
            PointerEventKind::Leave => self.set_cursor(Cursor::Default),
            // Feature metadata wins; the owning zone covers surfaces that omit it.
            PointerEventKind::Click => (self.on_click)(event.feature_id.as_deref().unwrap_or(owner)),
        }
        true
    }

    /// Releases every owned handle, tolerating a surface that is already gone.
    pub fn teardown(&mut self) {
        let handles = std::mem::take(&mut self.handles);
        for (zone_id, h) in &handles {
            self.release(zone_id, h);
        }
    }

    pub fn drawn_ids(&self) -> impl Iterator<Item = &str> {
        self.handles.keys().map(String::as_str)
    }

    pub fn is_drawn(&self, zone_id: &str) -> bool {
        self.handles.contains_key(zone_id)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn paints_for(&self, zone: &GeoZone) -> (Paint, Paint) {
        let fill_color = if zone.fill_color.is_empty() {
            DEFAULT_FILL_COLOR.to_string()
        } else {
            zone.fill_color.clone()
        };
        let border_color = zone
            .border_color
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_BORDER_COLOR.to_string());

        (
            Paint::Fill {
                color: fill_color,
                opacity: self.tuning.fill_opacity,
            },
            Paint::Line {
                color: border_color,
                width: self.tuning.outline_width,
            },
        )
    }

    fn set_cursor(&self, cursor: Cursor) {
        if let Err(error) = self.surface.set_cursor(cursor) {
            debug!(%error, "failed to set cursor");
        }
    }

    // Layers go before the source; a source cannot be removed while referenced.
    fn release(&self, zone_id: &str, handles: &ZoneHandles) {
        for kind in FILL_EVENTS {
            log_release(zone_id, self.surface.unsubscribe(&handles.fill_layer_id, kind));
        }
        log_release(zone_id, self.surface.remove_layer(&handles.fill_layer_id));
        log_release(zone_id, self.surface.remove_layer(&handles.outline_layer_id));
        log_release(zone_id, self.surface.remove_source(&handles.source_id));
        debug!(zone_id, "zone layers released");
    }
}

fn feature_for(zone: &GeoZone) -> ZoneFeature {
    ZoneFeature {
        zone_id: zone.id.clone(),
        name: zone.name.clone(),
        ring: zone.ring.clone(),
    }
}

fn create_handles<S: RenderSurface>(
    surface: &S,
    zone_id: &str,
    feature: ZoneFeature,
    fill: Paint,
    outline: Paint,
) -> Result<ZoneHandles, SurfaceError> {
    let handles = ZoneHandles {
        source_id: source_id(zone_id),
        fill_layer_id: fill_layer_id(zone_id),
        outline_layer_id: outline_layer_id(zone_id),
        feature,
        fill,
        outline,
    };

    surface.add_source(SourceSpec {
        id: handles.source_id.clone(),
        feature: handles.feature.clone(),
    })?;

    let fill_layer = LayerSpec {
        id: handles.fill_layer_id.clone(),
        source: handles.source_id.clone(),
        paint: handles.fill.clone(),
    };
    if let Err(error) = surface.add_layer(fill_layer) {
        log_release(zone_id, surface.remove_source(&handles.source_id));
        return Err(error);
    }

    let outline_layer = LayerSpec {
        id: handles.outline_layer_id.clone(),
        source: handles.source_id.clone(),
        paint: handles.outline.clone(),
    };
    if let Err(error) = surface.add_layer(outline_layer) {
        log_release(zone_id, surface.remove_layer(&handles.fill_layer_id));
        log_release(zone_id, surface.remove_source(&handles.source_id));
        return Err(error);
    }

    for (attached, kind) in FILL_EVENTS.into_iter().enumerate() {
        if let Err(error) = surface.subscribe(&handles.fill_layer_id, kind) {
            for kind in &FILL_EVENTS[..attached] {
                log_release(zone_id, surface.unsubscribe(&handles.fill_layer_id, *kind));
            }
            log_release(zone_id, surface.remove_layer(&handles.outline_layer_id));
            log_release(zone_id, surface.remove_layer(&handles.fill_layer_id));
            log_release(zone_id, surface.remove_source(&handles.source_id));
            return Err(error);
        }
    }

    Ok(handles)
}

// Patches only what changed; the handles and their subscriptions stay in place.
fn update_handles<S: RenderSurface>(
    surface: &S,
    handles: &mut ZoneHandles,
    feature: ZoneFeature,
    fill: Paint,
    outline: Paint,
) {
    let zone_id = feature.zone_id.clone();

    if handles.feature != feature {
        match surface.set_source_data(&handles.source_id, feature.clone()) {
            Ok(()) => {
                debug!(%zone_id, "zone geometry replaced");
                handles.feature = feature;
            }
            Err(error) => warn!(%zone_id, %error, "failed to replace zone geometry"),
        }
    }
    if handles.fill != fill {
        match surface.set_paint(&handles.fill_layer_id, fill.clone()) {
            Ok(()) => handles.fill = fill,
            Err(error) => warn!(%zone_id, %error, "failed to restyle zone fill"),
        }
    }
    if handles.outline != outline {
        match surface.set_paint(&handles.outline_layer_id, outline.clone()) {
            Ok(()) => handles.outline = outline,
            Err(error) => warn!(%zone_id, %error, "failed to restyle zone outline"),
        }
    }
}

fn log_release(zone_id: &str, result: Result<(), SurfaceError>) {
    if let Err(error) = result {
        warn!(zone_id, %error, "failed to release zone handle");
    }
}
