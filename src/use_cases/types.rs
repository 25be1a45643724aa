// Use-case level inputs/outputs for the map session loop.

use crate::domain::surface::{DrawnGeometry, GeocodeResult, PointerEvent};
use crate::domain::{PositionUpdate, Task};

#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    ToggleDrawMode,
    ToggleSmartZoneMode,
    ExitEditMode,
    /// The draw tool finished a shape. `drawn` carries it when the event
    /// does; `None` leaves the tool's buffer as the source.
    DrawComplete { drawn: Option<DrawnGeometry> },
    GeocodeResult(GeocodeResult),
    ConfirmZoneName { name: String },
    ToggleZoneVisibility { id: String },
    DeleteZone { id: String },
    SelectZone { id: String },
    CenterOnZone { id: String },
    SelectTracker { id: String },
    SetTrackerColor { id: String, color: String },
    SetTrackerPhoto { id: String, photo: String },
    RemoveTrackerPhoto { id: String },
    /// New task from the task form; required tasks need a free tracker.
    AddTask(Task),
    SelectTask { id: String },
    DeleteTask { id: String },
    ToggleFollow,
    Toggle3D,
    Pointer(PointerEvent),
    Shutdown,
}

/// Position emitted by the motion engine, queued for the state holder.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionReport {
    pub tracker_id: String,
    pub update: PositionUpdate,
}

/// Counts exposed for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FleetSnapshot {
    pub trackers: usize,
    pub zones: usize,
    pub drawn_zones: usize,
    pub tasks: usize,
    pub markers: usize,
}
