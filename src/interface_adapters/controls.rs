// Headless stand-ins for the draw, geocode and naming-dialog collaborators.

use crate::domain::GeoZone;
use crate::domain::ports::{DrawTool, GeocodeTool, NamingDialog};
use crate::domain::surface::DrawnGeometry;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Draw control whose buffer is filled programmatically.
#[derive(Clone, Default)]
pub struct HeadlessDrawTool {
    drawn: Arc<Mutex<Vec<DrawnGeometry>>>,
    buttons_hidden: Arc<AtomicBool>,
}

impl HeadlessDrawTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<DrawnGeometry>> {
        self.drawn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a finished shape, as if the operator had drawn it.
    pub fn draw(&self, geometry: DrawnGeometry) {
        self.buffer().push(geometry);
    }

    pub fn drawn(&self) -> Vec<DrawnGeometry> {
        self.buffer().clone()
    }

    pub fn native_buttons_hidden(&self) -> bool {
        self.buttons_hidden.load(Ordering::Relaxed)
    }
}

impl DrawTool for HeadlessDrawTool {
    fn read_drawn(&self) -> Vec<DrawnGeometry> {
        self.drawn()
    }

    fn set_drawn(&self, drawn: Vec<DrawnGeometry>) {
        *self.buffer() = drawn;
    }

    fn delete_all(&self) {
        self.buffer().clear();
    }

    fn hide_native_buttons(&self) {
        self.buttons_hidden.store(true, Ordering::Relaxed);
    }
}

/// Geocode control; results are fed to the session as operator commands.
#[derive(Clone, Default)]
pub struct HeadlessGeocoder {
    registrations: Arc<AtomicUsize>,
}

impl HeadlessGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::Relaxed)
    }
}

impl GeocodeTool for HeadlessGeocoder {
    fn register_result_handler(&self) {
        let count = self.registrations.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(count, "geocoder result handler registered");
    }
}

/// Naming dialog that asks the operator on the log and remembers each request.
#[derive(Clone, Default)]
pub struct LoggingNamingDialog {
    requests: Arc<Mutex<Vec<String>>>,
}

impl LoggingNamingDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of the zones a name was requested for, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NamingDialog for LoggingNamingDialog {
    fn request_open(&self, pending: &GeoZone) {
        info!(
            zone_id = %pending.id,
            "zone awaiting a name, send ConfirmZoneName to save it"
        );
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(pending.id.clone());
    }
}
