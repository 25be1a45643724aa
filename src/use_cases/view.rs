// Camera behaviors: follow mode and the 3D buildings view.

use crate::domain::ports::RenderSurface;
use crate::domain::surface::{BASE_STYLE_SOURCE, FlyTo, LayerSpec, Paint};
use crate::domain::tuning::ViewTuning;
use crate::domain::SurfaceError;
use crate::use_cases::trackers::TrackerStore;
use tracing::{debug, info, warn};

pub const BUILDINGS_LAYER_ID: &str = "3d-buildings";

fn buildings_layer() -> LayerSpec {
    LayerSpec {
        id: BUILDINGS_LAYER_ID.to_string(),
        source: BASE_STYLE_SOURCE.to_string(),
        paint: Paint::Extrusion {
            color: "#aaa".to_string(),
            opacity: 0.6,
            min_zoom: 15.0,
        },
    }
}

pub struct ViewController<S> {
    surface: S,
    tuning: ViewTuning,
    three_d: bool,
}

impl<S> ViewController<S>
where
    S: RenderSurface,
{
    pub fn new(surface: S, tuning: ViewTuning) -> Self {
        Self {
            surface,
            tuning,
            three_d: false,
        }
    }

    pub fn is_3d(&self) -> bool {
        self.three_d
    }

    pub fn toggle_3d(&mut self) -> bool {
        self.three_d = !self.three_d;
        if let Err(error) = self.apply_3d() {
            warn!(three_d = self.three_d, %error, "failed to apply 3D mode");
        }
        info!(three_d = self.three_d, "3D mode toggled");
        self.three_d
    }

    /// Per-frame follow step: centers on the moving tracker, or ends follow
    /// mode when nothing is moving.
    pub fn follow(&self, trackers: &mut TrackerStore) {
        if !trackers.is_following() {
            return;
        }
        let Some(center) = trackers.moving().map(|t| t.coordinates) else {
            debug!("no moving tracker left, follow mode ended");
            trackers.stop_following();
            return;
        };
        if let Err(error) = self.surface.set_center(center) {
            debug!(%error, "failed to center on moving tracker");
        }
    }

    /// Removes the buildings layer if this controller added it.
    pub fn teardown(&self) {
        if !self.surface.has_layer(BUILDINGS_LAYER_ID) {
            return;
        }
        if let Err(error) = self.surface.remove_layer(BUILDINGS_LAYER_ID) {
            warn!(%error, "failed to remove buildings layer");
        }
    }

    fn apply_3d(&self) -> Result<(), SurfaceError> {
        let pitch = if self.three_d {
            self.tuning.three_d_pitch
        } else {
            0.0
        };
        self.surface.fly_to(FlyTo {
            pitch,
            bearing: 0.0,
            duration: self.tuning.fly_duration,
        })?;

        let present = self.surface.has_layer(BUILDINGS_LAYER_ID);
        match (self.three_d, present) {
            (true, false) => self.surface.add_layer(buildings_layer()),
            (false, true) => self.surface.remove_layer(BUILDINGS_LAYER_ID),
            _ => Ok(()),
        }
    }
}
