//! Simulation and presentation tuning.
//!
//! Keep this separate from runtime configuration (frame rate, fixture paths, etc.).
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionTuning {
    /// Time the simulated tracker spends travelling between two waypoints.
    pub segment_duration: Duration,

    /// Upper bound of the displayed speed in km/h.
    pub speed_cap_kmh: u32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            segment_duration: Duration::from_millis(8000),
            speed_cap_kmh: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneTuning {
    /// Screen padding in pixels when fitting the camera to a zone.
    pub fit_padding: f64,
    pub fit_duration: Duration,
    pub fill_opacity: f64,
    pub outline_width: f64,
}

impl Default for ZoneTuning {
    fn default() -> Self {
        Self {
            fit_padding: 50.0,
            fit_duration: Duration::from_millis(1000),
            fill_opacity: 0.6,
            outline_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTuning {
    /// Camera pitch in degrees while 3D mode is on.
    pub three_d_pitch: f64,
    pub fly_duration: Duration,
}

impl Default for ViewTuning {
    fn default() -> Self {
        Self {
            three_d_pitch: 60.0,
            fly_duration: Duration::from_millis(1500),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tuning {
    pub motion: MotionTuning,
    pub zones: ZoneTuning,
    pub view: ViewTuning,
}
