// Motion simulation for the single "moving" tracker.
//
// The tracker travels a recorded route back and forth forever (ping-pong),
// one segment per `MotionTuning::segment_duration`, interpolating linearly
// between waypoints on every frame.

use crate::domain::geo::{great_circle_distance_km, lerp};
use crate::domain::ports::PositionSink;
use crate::domain::tuning::MotionTuning;
use crate::domain::{LngLat, PositionUpdate, Route};
use std::time::Duration;
use tracing::{debug, info};

const SECS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// Position of the playback within the route.
///
/// `current_index` always addresses a waypoint and `elapsed_within_segment`
/// never exceeds the segment duration between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackCursor {
    pub current_index: usize,
    pub direction: Direction,
    pub elapsed_within_segment: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackState {
    pub cursor: PlaybackCursor,
    /// Timestamp of the previous frame; `None` until a frame sets the baseline.
    pub last_frame: Option<Duration>,
}

/// Advances the playback by one frame.
///
/// Pure function of `(route, state, now)`. The first frame after a reset only
/// records the baseline timestamp. Reaching the end of a segment moves the
/// cursor to the next waypoint; arriving at either end of the route flips the
/// direction so the next frame heads back.
pub fn step(
    route: &Route,
    state: PlaybackState,
    now: Duration,
    tuning: &MotionTuning,
) -> (PlaybackState, Option<PositionUpdate>) {
    let Some(last_frame) = state.last_frame else {
        return (
            PlaybackState {
                last_frame: Some(now),
                ..state
            },
            None,
        );
    };

    let mut cursor = state.cursor;
    let next_state = |cursor| PlaybackState {
        cursor,
        last_frame: Some(now),
    };

    if route.len() < 2 {
        return (next_state(cursor), None);
    }

    cursor.elapsed_within_segment += now.saturating_sub(last_frame);

    let segment = route.position(cursor.current_index).zip(
        neighbour(cursor.current_index, cursor.direction, route.len())
            .and_then(|i| route.position(i).map(|p| (i, p))),
    );
    let Some((from, (next_index, to))) = segment else {
        // No waypoint ahead: flip and snap to the matching end without moving this frame.
        cursor.direction = cursor.direction.flipped();
        cursor.current_index = match cursor.direction {
            Direction::Forward => 0,
            Direction::Reverse => route.len() - 1,
        };
        cursor.elapsed_within_segment = Duration::ZERO;
        return (next_state(cursor), None);
    };

    let progress = segment_progress(cursor.elapsed_within_segment, tuning.segment_duration);
    let position = lerp(from, to, progress);
    let update = PositionUpdate {
        lat: position.lat,
        lng: position.lng,
        speed_kmh: segment_speed_kmh(from, to, tuning),
    };

    if progress >= 1.0 {
        cursor.current_index = next_index;
        cursor.elapsed_within_segment = Duration::ZERO;
        if neighbour(next_index, cursor.direction, route.len()).is_none() {
            cursor.direction = cursor.direction.flipped();
        }
    }

    (next_state(cursor), Some(update))
}

/// Displayed speed for a segment, derived from its great-circle length.
///
/// Identical endpoints give 0; the result never exceeds the configured cap.
pub fn segment_speed_kmh(from: LngLat, to: LngLat, tuning: &MotionTuning) -> u32 {
    let distance_km = great_circle_distance_km(from, to);
    if distance_km <= 0.0 {
        return 0;
    }
    let hours = tuning.segment_duration.as_secs_f64() / SECS_PER_HOUR;
    if hours <= 0.0 {
        return tuning.speed_cap_kmh;
    }
    (distance_km / hours)
        .round()
        .min(f64::from(tuning.speed_cap_kmh)) as u32
}

fn segment_progress(elapsed: Duration, segment: Duration) -> f64 {
    if segment.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / segment.as_secs_f64()).min(1.0)
}

fn neighbour(index: usize, direction: Direction, len: usize) -> Option<usize> {
    match direction {
        Direction::Forward => Some(index + 1).filter(|&i| i < len),
        Direction::Reverse => index.checked_sub(1),
    }
}

/// Frame-driven simulation engine for one tracker.
///
/// Driven by an external scheduler calling [`MotionEngine::tick`] once per
/// frame; every emitted position is pushed to the registered sink.
pub struct MotionEngine<P> {
    sink: P,
    tuning: MotionTuning,
    tracker_id: Option<String>,
    route: Route,
    state: PlaybackState,
    running: bool,
}

impl<P> MotionEngine<P>
where
    P: PositionSink,
{
    pub fn new(sink: P, tuning: MotionTuning) -> Self {
        Self {
            sink,
            tuning,
            tracker_id: None,
            route: Route::default(),
            state: PlaybackState::default(),
            running: false,
        }
    }

    /// Replaces the route and rewinds the cursor to the first waypoint.
    ///
    /// Routes shorter than two waypoints are ignored and the current route is kept.
    pub fn load(&mut self, route: Route, tracker_id: impl Into<String>) {
        let tracker_id = tracker_id.into();
        if route.len() < 2 {
            debug!(%tracker_id, waypoints = route.len(), "route too short, ignoring");
            return;
        }

        info!(%tracker_id, waypoints = route.len(), "route loaded");
        self.route = route;
        self.tracker_id = Some(tracker_id);
        self.state = PlaybackState::default();
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.state.last_frame = None;
        debug!(tracker_id = ?self.tracker_id, "motion started");
    }

    /// Cancels the tick chain; later ticks are ignored until `start` is called again.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.state.last_frame = None;
        debug!(tracker_id = ?self.tracker_id, "motion stopped");
    }

    pub fn tick(&mut self, now: Duration) -> Option<PositionUpdate> {
        if !self.running {
            return None;
        }
        let tracker_id = self.tracker_id.as_deref()?;

        let (state, update) = step(&self.route, self.state, now, &self.tuning);
        self.state = state;

        if let Some(update) = update {
            self.sink.publish(tracker_id, update);
        }
        update
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tracker_id(&self) -> Option<&str> {
        self.tracker_id.as_deref()
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn cursor(&self) -> PlaybackCursor {
        self.state.cursor
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }
}
