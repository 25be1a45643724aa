// In-memory rendering surface for headless sessions and tests.
//
// Keeps a scene graph with the same bookkeeping rules a real map enforces
// (unique ids, sources pinned by layers) and a journal of every successful
// mutation so callers can assert on exactly what was sent to the surface.

use crate::domain::geo::Bounds;
use crate::domain::ports::RenderSurface;
use crate::domain::surface::{
    BASE_STYLE_SOURCE, ControlKind, Cursor, FitOptions, FlyTo, LayerSpec, MarkerIcon, MarkerSpec, Paint,
    PointerEvent, PointerEventKind, PointerTarget, SourceSpec, ZoneFeature,
};
use crate::domain::{LngLat, SurfaceError};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

const INITIAL_CENTER: LngLat = LngLat::new(37.6173, 55.7558);

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    AddSource(String),
    SetSourceData(String),
    RemoveSource(String),
    AddLayer(String),
    SetPaint(String),
    RemoveLayer(String),
    Subscribe(String, PointerEventKind),
    Unsubscribe(String, PointerEventKind),
    SetCursor(Cursor),
    FitBounds,
    SetCenter,
    FlyTo,
    AddMarker(String),
    MoveMarker(String),
    SetMarkerIcon(String),
    SetMarkerLabel(String),
    RemoveMarker(String),
    AddControl(ControlKind),
    RemoveControl(ControlKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: LngLat,
    pub pitch: f64,
    pub bearing: f64,
    pub last_fit: Option<FitOptions>,
}

#[derive(Debug)]
struct Scene {
    available: bool,
    base_sources: BTreeSet<String>,
    sources: BTreeMap<String, SourceSpec>,
    layers: Vec<LayerSpec>,
    subscriptions: HashMap<(String, PointerEventKind), usize>,
    cursor: Cursor,
    markers: BTreeMap<String, MarkerSpec>,
    controls: Vec<ControlKind>,
    camera: Camera,
    journal: Vec<SurfaceCall>,
}

impl Scene {
    fn new() -> Self {
        Self {
            available: true,
            base_sources: BTreeSet::from([BASE_STYLE_SOURCE.to_string()]),
            sources: BTreeMap::new(),
            layers: Vec::new(),
            subscriptions: HashMap::new(),
            cursor: Cursor::Default,
            markers: BTreeMap::new(),
            controls: Vec::new(),
            camera: Camera {
                center: INITIAL_CENTER,
                pitch: 0.0,
                bearing: 0.0,
                last_fit: None,
            },
            journal: Vec::new(),
        }
    }

    fn ensure_available(&self) -> Result<(), SurfaceError> {
        if self.available {
            Ok(())
        } else {
            Err(SurfaceError::Unavailable)
        }
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id) || self.base_sources.contains(id)
    }

    fn layer_mut(&mut self, id: &str) -> Result<&mut LayerSpec, SurfaceError> {
        self.layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| SurfaceError::UnknownId(id.to_string()))
    }

    fn marker_mut(&mut self, id: &str) -> Result<&mut MarkerSpec, SurfaceError> {
        self.markers
            .get_mut(id)
            .ok_or_else(|| SurfaceError::UnknownId(id.to_string()))
    }
}

/// Cloneable handle to a shared in-memory scene.
#[derive(Clone)]
pub struct HeadlessSurface {
    scene: Arc<Mutex<Scene>>,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            scene: Arc::new(Mutex::new(Scene::new())),
        }
    }

    fn scene(&self) -> MutexGuard<'_, Scene> {
        self.scene.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Runs a mutation and journals it when it succeeds.
    fn apply<F>(&self, call: SurfaceCall, mutation: F) -> Result<(), SurfaceError>
    where
        F: FnOnce(&mut Scene) -> Result<(), SurfaceError>,
    {
        let mut scene = self.scene();
        scene.ensure_available()?;
        mutation(&mut scene)?;
        debug!(?call, "surface updated");
        scene.journal.push(call);
        Ok(())
    }

    /// Simulates the surface going away; every later call fails with `Unavailable`.
    pub fn tear_down(&self) {
        let mut scene = self.scene();
        *scene = Scene {
            available: false,
            journal: std::mem::take(&mut scene.journal),
            ..Scene::new()
        };
        debug!("surface torn down");
    }

    pub fn is_available(&self) -> bool {
        self.scene().available
    }

    pub fn journal(&self) -> Vec<SurfaceCall> {
        self.scene().journal.clone()
    }

    pub fn clear_journal(&self) {
        self.scene().journal.clear();
    }

    pub fn source_ids(&self) -> Vec<String> {
        self.scene().sources.keys().cloned().collect()
    }

    pub fn source(&self, id: &str) -> Option<SourceSpec> {
        self.scene().sources.get(id).cloned()
    }

    pub fn layer_ids(&self) -> Vec<String> {
        self.scene().layers.iter().map(|l| l.id.clone()).collect()
    }

    pub fn layer(&self, id: &str) -> Option<LayerSpec> {
        self.scene().layers.iter().find(|l| l.id == id).cloned()
    }

    pub fn subscription_count(&self, layer_id: &str, kind: PointerEventKind) -> usize {
        self.scene()
            .subscriptions
            .get(&(layer_id.to_string(), kind))
            .copied()
            .unwrap_or(0)
    }

    pub fn cursor(&self) -> Cursor {
        self.scene().cursor
    }

    pub fn marker_ids(&self) -> Vec<String> {
        self.scene().markers.keys().cloned().collect()
    }

    pub fn marker(&self, id: &str) -> Option<MarkerSpec> {
        self.scene().markers.get(id).cloned()
    }

    pub fn controls(&self) -> Vec<ControlKind> {
        self.scene().controls.clone()
    }

    pub fn camera(&self) -> Camera {
        self.scene().camera
    }

    /// Builds the pointer event a real map would emit for `layer_id`, with the
    /// feature metadata of the layer's source attached.
    pub fn simulate_pointer(&self, layer_id: &str, kind: PointerEventKind) -> Option<PointerEvent> {
        let scene = self.scene();
        let layer = scene.layers.iter().find(|l| l.id == layer_id)?;
        let feature_id = scene
            .sources
            .get(&layer.source)
            .map(|s| s.feature.zone_id.clone());

        Some(PointerEvent {
            target: PointerTarget::Layer(layer_id.to_string()),
            kind,
            feature_id,
        })
    }

    pub fn simulate_marker_click(&self, marker_id: &str) -> Option<PointerEvent> {
        let scene = self.scene();
        scene.markers.get(marker_id)?;

        Some(PointerEvent {
            target: PointerTarget::Marker(marker_id.to_string()),
            kind: PointerEventKind::Click,
            feature_id: None,
        })
    }
}

impl RenderSurface for HeadlessSurface {
    fn add_source(&self, source: SourceSpec) -> Result<(), SurfaceError> {
        let call = SurfaceCall::AddSource(source.id.clone());
        self.apply(call, |scene| {
            if scene.has_source(&source.id) {
                return Err(SurfaceError::DuplicateId(source.id));
            }
            scene.sources.insert(source.id.clone(), source);
            Ok(())
        })
    }

    fn set_source_data(&self, source_id: &str, feature: ZoneFeature) -> Result<(), SurfaceError> {
        let call = SurfaceCall::SetSourceData(source_id.to_string());
        self.apply(call, |scene| {
            let source = scene
                .sources
                .get_mut(source_id)
                .ok_or_else(|| SurfaceError::UnknownId(source_id.to_string()))?;
            source.feature = feature;
            Ok(())
        })
    }

    fn remove_source(&self, source_id: &str) -> Result<(), SurfaceError> {
        let call = SurfaceCall::RemoveSource(source_id.to_string());
        self.apply(call, |scene| {
            if !scene.sources.contains_key(source_id) {
                return Err(SurfaceError::UnknownId(source_id.to_string()));
            }
            if scene.layers.iter().any(|l| l.source == source_id) {
                return Err(SurfaceError::SourceInUse(source_id.to_string()));
            }
            scene.sources.remove(source_id);
            Ok(())
        })
    }

    fn add_layer(&self, layer: LayerSpec) -> Result<(), SurfaceError> {
        let call = SurfaceCall::AddLayer(layer.id.clone());
        self.apply(call, |scene| {
            if scene.layers.iter().any(|l| l.id == layer.id) {
                return Err(SurfaceError::DuplicateId(layer.id));
            }
            if !scene.has_source(&layer.source) {
                return Err(SurfaceError::UnknownId(layer.source));
            }
            scene.layers.push(layer);
            Ok(())
        })
    }

    fn set_paint(&self, layer_id: &str, paint: Paint) -> Result<(), SurfaceError> {
        let call = SurfaceCall::SetPaint(layer_id.to_string());
        self.apply(call, |scene| {
            scene.layer_mut(layer_id)?.paint = paint;
            Ok(())
        })
    }

    fn remove_layer(&self, layer_id: &str) -> Result<(), SurfaceError> {
        let call = SurfaceCall::RemoveLayer(layer_id.to_string());
        self.apply(call, |scene| {
            let before = scene.layers.len();
            scene.layers.retain(|l| l.id != layer_id);
            if scene.layers.len() == before {
                return Err(SurfaceError::UnknownId(layer_id.to_string()));
            }
            Ok(())
        })
    }

    fn has_layer(&self, layer_id: &str) -> bool {
        let scene = self.scene();
        scene.available && scene.layers.iter().any(|l| l.id == layer_id)
    }

    fn subscribe(&self, layer_id: &str, kind: PointerEventKind) -> Result<(), SurfaceError> {
        let call = SurfaceCall::Subscribe(layer_id.to_string(), kind);
        self.apply(call, |scene| {
            *scene
                .subscriptions
                .entry((layer_id.to_string(), kind))
                .or_default() += 1;
            Ok(())
        })
    }

    fn unsubscribe(&self, layer_id: &str, kind: PointerEventKind) -> Result<(), SurfaceError> {
        let call = SurfaceCall::Unsubscribe(layer_id.to_string(), kind);
        self.apply(call, |scene| {
            let key = (layer_id.to_string(), kind);
            match scene.subscriptions.get_mut(&key) {
                Some(count) if *count > 1 => *count -= 1,
                Some(_) => {
                    scene.subscriptions.remove(&key);
                }
                None => return Err(SurfaceError::UnknownId(layer_id.to_string())),
            }
            Ok(())
        })
    }

    fn set_cursor(&self, cursor: Cursor) -> Result<(), SurfaceError> {
        self.apply(SurfaceCall::SetCursor(cursor), |scene| {
            scene.cursor = cursor;
            Ok(())
        })
    }

    fn fit_bounds(&self, options: FitOptions) -> Result<(), SurfaceError> {
        self.apply(SurfaceCall::FitBounds, |scene| {
            scene.camera.center = center_of(&options.bounds);
            scene.camera.last_fit = Some(options);
            Ok(())
        })
    }

    fn set_center(&self, center: LngLat) -> Result<(), SurfaceError> {
        self.apply(SurfaceCall::SetCenter, |scene| {
            scene.camera.center = center;
            Ok(())
        })
    }

    fn fly_to(&self, target: FlyTo) -> Result<(), SurfaceError> {
        self.apply(SurfaceCall::FlyTo, |scene| {
            scene.camera.pitch = target.pitch;
            scene.camera.bearing = target.bearing;
            Ok(())
        })
    }

    fn add_marker(&self, marker: MarkerSpec) -> Result<(), SurfaceError> {
        let call = SurfaceCall::AddMarker(marker.id.clone());
        self.apply(call, |scene| {
            if scene.markers.contains_key(&marker.id) {
                return Err(SurfaceError::DuplicateId(marker.id));
            }
            scene.markers.insert(marker.id.clone(), marker);
            Ok(())
        })
    }

    fn move_marker(&self, marker_id: &str, position: LngLat) -> Result<(), SurfaceError> {
        let call = SurfaceCall::MoveMarker(marker_id.to_string());
        self.apply(call, |scene| {
            scene.marker_mut(marker_id)?.position = position;
            Ok(())
        })
    }

    fn set_marker_icon(&self, marker_id: &str, icon: MarkerIcon) -> Result<(), SurfaceError> {
        let call = SurfaceCall::SetMarkerIcon(marker_id.to_string());
        self.apply(call, |scene| {
            scene.marker_mut(marker_id)?.icon = icon;
            Ok(())
        })
    }

    fn set_marker_label(&self, marker_id: &str, label: &str) -> Result<(), SurfaceError> {
        let call = SurfaceCall::SetMarkerLabel(marker_id.to_string());
        self.apply(call, |scene| {
            scene.marker_mut(marker_id)?.label = label.to_string();
            Ok(())
        })
    }

    fn remove_marker(&self, marker_id: &str) -> Result<(), SurfaceError> {
        let call = SurfaceCall::RemoveMarker(marker_id.to_string());
        self.apply(call, |scene| {
            scene
                .markers
                .remove(marker_id)
                .map(|_| ())
                .ok_or_else(|| SurfaceError::UnknownId(marker_id.to_string()))
        })
    }

    fn add_control(&self, control: ControlKind) -> Result<(), SurfaceError> {
        self.apply(SurfaceCall::AddControl(control), |scene| {
            if scene.controls.contains(&control) {
                return Err(SurfaceError::DuplicateId(format!("{control:?}")));
            }
            scene.controls.push(control);
            Ok(())
        })
    }

    fn remove_control(&self, control: ControlKind) -> Result<(), SurfaceError> {
        self.apply(SurfaceCall::RemoveControl(control), |scene| {
            let before = scene.controls.len();
            scene.controls.retain(|c| *c != control);
            if scene.controls.len() == before {
                return Err(SurfaceError::UnknownId(format!("{control:?}")));
            }
            Ok(())
        })
    }
}

fn center_of(bounds: &Bounds) -> LngLat {
    LngLat::new(
        (bounds.south_west.lng + bounds.north_east.lng) / 2.0,
        (bounds.south_west.lat + bounds.north_east.lat) / 2.0,
    )
}
