// Tracker collection with selection and follow state.

use crate::domain::{PositionUpdate, Tracker};
use chrono::{DateTime, Utc};
use tracing::debug;

#[derive(Debug, Default)]
pub struct TrackerStore {
    trackers: Vec<Tracker>,
    selected: Option<String>,
    following: bool,
}

impl TrackerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection, keeping the selection only if it still resolves.
    pub fn load(&mut self, trackers: Vec<Tracker>) {
        self.trackers = trackers;
        if self.selected().is_none() {
            self.selected = None;
        }
    }

    pub fn all(&self) -> &[Tracker] {
        &self.trackers
    }

    pub fn get(&self, id: &str) -> Option<&Tracker> {
        self.trackers.iter().find(|t| t.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.trackers.iter().map(|t| t.id.clone()).collect()
    }

    /// Selecting a tracker ends follow mode.
    pub fn select(&mut self, id: &str) {
        self.stop_following();
        self.selected = Some(id.to_string());
    }

    pub fn selected(&self) -> Option<&Tracker> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// First tracker in the moving state.
    pub fn moving(&self) -> Option<&Tracker> {
        self.trackers.iter().find(|t| t.is_moving())
    }

    /// Applies a simulated position; unknown ids are ignored.
    pub fn update_position(&mut self, id: &str, update: PositionUpdate, now: DateTime<Utc>) {
        let Some(tracker) = self.get_mut(id) else {
            return;
        };
        tracker.coordinates = update.position();
        tracker.speed = Some(update.speed_kmh);
        tracker.last_update = now;
    }

    pub fn update_color(&mut self, id: &str, color: impl Into<String>) {
        if let Some(tracker) = self.get_mut(id) {
            tracker.color = Some(color.into());
        }
    }

    pub fn update_photo(&mut self, id: &str, photo: impl Into<String>) {
        if let Some(tracker) = self.get_mut(id) {
            tracker.photo = Some(photo.into());
        }
    }

    pub fn remove_photo(&mut self, id: &str) {
        if let Some(tracker) = self.get_mut(id) {
            tracker.photo = None;
        }
    }

    pub fn toggle_follow(&mut self) -> bool {
        self.following = !self.following;
        debug!(following = self.following, "follow mode toggled");
        self.following
    }

    pub fn stop_following(&mut self) {
        if self.following {
            self.toggle_follow();
        }
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Tracker> {
        self.trackers.iter_mut().find(|t| t.id == id)
    }
}
