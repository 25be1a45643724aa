// Delivery tasks and the tracker assignment rules derived from them.

use crate::domain::Task;
use tracing::info;

#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    selected: Option<String>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        if self.selected().is_none() {
            self.selected = None;
        }
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn select(&mut self, id: &str) {
        self.selected = Some(id.to_string());
    }

    pub fn selected(&self) -> Option<&Task> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.tasks.len() != before
    }

    /// Appends the task and selects it.
    pub fn add(&mut self, task: Task) -> &Task {
        info!(task_id = %task.id, tracker_id = %task.tracker_id, "task added");
        let id = task.id.clone();
        self.tasks.push(task);
        self.select(&id);
        &self.tasks[self.tasks.len() - 1]
    }

    /// Only required tasks hold a tracker.
    pub fn is_tracker_assigned(&self, tracker_id: &str) -> bool {
        self.tasks
            .iter()
            .any(|t| t.required && t.tracker_id == tracker_id)
    }

    pub fn assigned_trackers(&self) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|t| t.required)
            .map(|t| t.tracker_id.as_str())
            .collect()
    }

    /// Tracker ids from `all` that no required task holds, in input order.
    pub fn available_trackers<'a>(&self, all: &'a [String]) -> Vec<&'a str> {
        all.iter()
            .map(String::as_str)
            .filter(|id| !self.is_tracker_assigned(id))
            .collect()
    }

    pub fn tasks_for_zone<'a>(&'a self, zone_id: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |t| t.geo_zone_id == zone_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::task;

    fn store() -> TaskStore {
        let mut store = TaskStore::new();
        store.load(vec![
            task("1", "3", "1", true),
            task("2", "1", "2", true),
            task("3", "2", "3", false),
        ]);
        store
    }

    #[test]
    fn when_only_optional_task_holds_tracker_then_it_is_not_assigned() {
        let store = store();

        assert!(store.is_tracker_assigned("1"));
        assert!(!store.is_tracker_assigned("3"));
        assert_eq!(store.assigned_trackers(), vec!["1", "2"]);
    }

    #[test]
    fn when_listing_available_trackers_then_required_assignments_are_excluded() {
        let store = store();
        let all: Vec<String> = ["1", "2", "3", "4"].iter().map(|s| s.to_string()).collect();

        assert_eq!(store.available_trackers(&all), vec!["3", "4"]);
    }

    #[test]
    fn when_task_is_added_then_it_becomes_selected() {
        let mut store = store();

        store.add(task("4", "1", "4", false));

        assert_eq!(store.selected().map(|t| t.id.as_str()), Some("4"));
    }

    #[test]
    fn when_selected_task_is_deleted_then_selection_is_cleared() {
        let mut store = store();
        store.select("2");

        assert!(store.delete("2"));

        assert!(store.selected().is_none());
        assert_eq!(store.tasks_for_zone("1").count(), 0);
        assert_eq!(store.tasks_for_zone("3").count(), 1);
    }
}
