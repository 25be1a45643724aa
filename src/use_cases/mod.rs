// Use cases layer: map workflows driven by the session loop.

pub mod edit_modes;
pub mod geozones;
pub mod markers;
pub mod motion;
pub mod session;
pub mod tasks;
pub mod trackers;
pub mod types;
pub mod view;
pub mod zone_sync;

#[cfg(test)]
pub(crate) mod test_support;

pub use session::{MapSession, SessionPorts, map_task};
pub use types::{FleetSnapshot, MapCommand, PositionReport};
