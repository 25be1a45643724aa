use crate::domain::tuning::{MotionTuning, Tuning, ViewTuning, ZoneTuning};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, time::Duration};
use thiserror::Error;

// Runtime constants and environment (not simulation tuning).

pub const COMMAND_CHANNEL_CAPACITY: usize = 1024;

pub fn fixtures_dir() -> Option<PathBuf> {
    env::var_os("FIXTURES_DIR").map(PathBuf::from)
}

pub fn tuning_file() -> Option<PathBuf> {
    env::var_os("TUNING_FILE").map(PathBuf::from)
}

pub fn frame_interval() -> Duration {
    Duration::from_millis(millis_var("FRAME_INTERVAL_MS").unwrap_or(16).max(1))
}

// Latency of the fixture data source, mirroring a remote API.
pub fn fetch_delay() -> Duration {
    Duration::from_millis(millis_var("FETCH_DELAY_MS").unwrap_or(100))
}

/// Wall-clock limit for a headless run; `None` runs until input closes.
pub fn run_for() -> Option<Duration> {
    env::var("RUN_FOR_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

fn millis_var(name: &str) -> Option<u64> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid tuning file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid tuning value: {0}")]
    InvalidValue(String),
}

// Every key is optional; omitted values keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TuningFile {
    motion: MotionSection,
    zones: ZoneSection,
    view: ViewSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MotionSection {
    segment_duration_ms: Option<u64>,
    speed_cap_kmh: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ZoneSection {
    fit_padding: Option<f64>,
    fit_duration_ms: Option<u64>,
    fill_opacity: Option<f64>,
    outline_width: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ViewSection {
    three_d_pitch: Option<f64>,
    fly_duration_ms: Option<u64>,
}

/// Loads tuning from `path`, or the defaults when no file is configured.
pub fn load_tuning(path: Option<&Path>) -> Result<Tuning, ConfigError> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_tuning(&raw)
}

pub fn parse_tuning(raw: &str) -> Result<Tuning, ConfigError> {
    let file: TuningFile = toml::from_str(raw)?;

    let defaults = MotionTuning::default();
    let motion = MotionTuning {
        segment_duration: file
            .motion
            .segment_duration_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.segment_duration),
        speed_cap_kmh: file.motion.speed_cap_kmh.unwrap_or(defaults.speed_cap_kmh),
    };
    if motion.segment_duration.is_zero() {
        return Err(ConfigError::InvalidValue(
            "motion.segment_duration_ms must be greater than zero".to_string(),
        ));
    }

    let defaults = ZoneTuning::default();
    let zones = ZoneTuning {
        fit_padding: file.zones.fit_padding.unwrap_or(defaults.fit_padding),
        fit_duration: file
            .zones
            .fit_duration_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.fit_duration),
        fill_opacity: file.zones.fill_opacity.unwrap_or(defaults.fill_opacity),
        outline_width: file.zones.outline_width.unwrap_or(defaults.outline_width),
    };
    if !(0.0..=1.0).contains(&zones.fill_opacity) {
        return Err(ConfigError::InvalidValue(format!(
            "zones.fill_opacity must be within 0..=1, got {}",
            zones.fill_opacity
        )));
    }

    let defaults = ViewTuning::default();
    let view = ViewTuning {
        three_d_pitch: file.view.three_d_pitch.unwrap_or(defaults.three_d_pitch),
        fly_duration: file
            .view
            .fly_duration_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.fly_duration),
    };

    Ok(Tuning {
        motion,
        zones,
        view,
    })
}
