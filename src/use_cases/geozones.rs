// Zone collection: the single source of truth the zone synchronizer renders from.

use crate::domain::GeoZone;
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct GeoZoneStore {
    zones: Vec<GeoZone>,
    selected: Option<String>,
}

impl GeoZoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, zones: Vec<GeoZone>) {
        self.zones = zones;
        if self.selected().is_none() {
            self.selected = None;
        }
    }

    pub fn all(&self) -> &[GeoZone] {
        &self.zones
    }

    pub fn get(&self, id: &str) -> Option<&GeoZone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Selecting a zone also makes it visible.
    pub fn select(&mut self, id: &str) {
        self.selected = Some(id.to_string());
        self.toggle_visibility(id, true);
    }

    pub fn selected(&self) -> Option<&GeoZone> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Flips visibility, or forces it on when `force_visible` is set.
    ///
    /// Returns false when the id is unknown.
    pub fn toggle_visibility(&mut self, id: &str, force_visible: bool) -> bool {
        let Some(zone) = self.zones.iter_mut().find(|z| z.id == id) else {
            return false;
        };
        zone.visible = force_visible || !zone.visible;
        debug!(zone_id = id, visible = zone.visible, "zone visibility changed");
        true
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.zones.len();
        self.zones.retain(|z| z.id != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        let removed = self.zones.len() != before;
        if removed {
            info!(zone_id = id, "zone deleted");
        }
        removed
    }

    pub fn add(&mut self, zone: GeoZone) {
        info!(zone_id = %zone.id, name = %zone.name, "zone added");
        self.zones.push(zone);
    }
}
