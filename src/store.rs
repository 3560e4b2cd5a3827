//! Task store for taskflow.
//!
//! Owns the canonical newest-first task list and mediates all mutations.
//! Every mutation rewrites the full snapshot through the key-value
//! boundary; callers never edit the list structurally themselves.
//!
//! Mutations referencing an id that is not present are silent no-ops: the
//! list is unchanged and the return value reports the miss so the caller
//! can phrase its message. A miss is never an error.

use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::{KeyValueStore, TASKS_KEY};
use crate::task::{Task, TaskDraft};

pub struct TaskStore {
    tasks: Vec<Task>,
    store: Box<dyn KeyValueStore>,
}

impl TaskStore {
    /// Hydrate a store from the key-value surface.
    ///
    /// An absent snapshot means "no tasks yet". A well-formed snapshot is
    /// normalized and written back so the stored format matches what this
    /// version writes. A malformed snapshot falls back to an empty list
    /// with a warning; the stored value is left untouched until the next
    /// mutation overwrites it.
    pub fn open(store: Box<dyn KeyValueStore>) -> Result<Self> {
        let mut tasks = Vec::new();
        let mut rewrite = true;

        match store.get(TASKS_KEY)? {
            None => {
                debug!("no task snapshot found, starting empty");
            }
            Some(raw) => match serde_json::from_str::<Vec<Task>>(&raw) {
                Ok(mut loaded) => {
                    for task in &mut loaded {
                        task.normalize();
                    }
                    debug!(count = loaded.len(), "loaded task snapshot");
                    tasks = loaded;
                }
                Err(err) => {
                    warn!(%err, "task snapshot is malformed, starting empty");
                    rewrite = false;
                }
            },
        }

        let store = Self { tasks, store };
        if rewrite {
            store.persist()?;
        }
        Ok(store)
    }

    /// The full list, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Find a task by id.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Construct a task from the draft and prepend it (newest first).
    pub fn add(&mut self, draft: &TaskDraft) -> Result<Task> {
        draft.validate()?;
        let task = Task::from_draft(draft);
        self.tasks.insert(0, task.clone());
        self.persist()?;
        Ok(task)
    }

    /// Batch form of [`add`](Self::add): every draft gets its own id and
    /// timestamp, and the new tasks are prepended as a block preserving
    /// the relative order of the input.
    pub fn add_many(&mut self, drafts: &[TaskDraft]) -> Result<Vec<Task>> {
        for draft in drafts {
            draft.validate()?;
        }
        let created: Vec<Task> = drafts.iter().map(Task::from_draft).collect();
        self.tasks.splice(0..0, created.iter().cloned());
        self.persist()?;
        Ok(created)
    }

    /// Replace the stored task whose id matches `task.id` with the given
    /// full value. Returns false (and leaves the list unchanged) when no
    /// task has that id.
    pub fn update(&mut self, mut task: Task) -> Result<bool> {
        task.normalize();
        let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) else {
            return Ok(false);
        };
        *slot = task;
        self.persist()?;
        Ok(true)
    }

    /// Flip the `completed` flag of the task with the given id. Returns
    /// the new flag value, or None when no task has that id.
    pub fn toggle_completed(&mut self, id: &str) -> Result<Option<bool>> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        task.completed = !task.completed;
        let now = task.completed;
        self.persist()?;
        Ok(Some(now))
    }

    /// Delete the task with the given id. Returns false when no task has
    /// that id.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let Some(idx) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        self.tasks.remove(idx);
        self.persist()?;
        Ok(true)
    }

    /// Serialize the current list and replace the stored snapshot.
    pub fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.tasks)?;
        self.store.set(TASKS_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use crate::task::{Category, Priority};
    use tempfile::TempDir;

    impl TaskStore {
        /// Store backed by an in-memory map.
        fn in_memory() -> Self {
            Self::open(Box::new(MemoryStore::new())).unwrap()
        }
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft::new(title)
    }

    #[test]
    fn add_prepends_with_completed_false_and_unique_id() {
        let mut store = TaskStore::in_memory();
        let first = store.add(&draft("first")).unwrap();
        let second = store.add(&draft("second")).unwrap();

        assert_ne!(first.id, second.id);
        assert!(!second.completed);
        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["second", "first"]);
    }

    #[test]
    fn add_rejects_empty_title_and_leaves_list_unchanged() {
        let mut store = TaskStore::in_memory();
        store.add(&draft("kept")).unwrap();
        assert!(store.add(&draft("  ")).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_many_prepends_block_preserving_input_order() {
        let mut store = TaskStore::in_memory();
        store.add(&draft("C")).unwrap();

        store.add_many(&[draft("d1"), draft("d2")]).unwrap();

        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["d1", "d2", "C"]);
    }

    #[test]
    fn toggle_twice_restores_original_state() {
        let mut store = TaskStore::in_memory();
        let task = store.add(&draft("flip")).unwrap();

        assert_eq!(store.toggle_completed(&task.id).unwrap(), Some(true));
        assert_eq!(store.toggle_completed(&task.id).unwrap(), Some(false));
        assert!(!store.get(&task.id).unwrap().completed);
    }

    #[test]
    fn toggle_unknown_id_is_a_silent_noop() {
        let mut store = TaskStore::in_memory();
        store.add(&draft("only")).unwrap();
        assert_eq!(store.toggle_completed("missing").unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = TaskStore::in_memory();
        let task = store.add(&draft("gone")).unwrap();

        assert!(store.remove(&task.id).unwrap());
        let after_first: Vec<Task> = store.tasks().to_vec();
        assert!(!store.remove(&task.id).unwrap());
        assert_eq!(store.tasks(), after_first.as_slice());
    }

    #[test]
    fn update_replaces_full_value() {
        let mut store = TaskStore::in_memory();
        let mut task = store.add(&draft("before")).unwrap();

        task.title = "after".to_string();
        task.priority = Priority::High;
        task.category = Category::Work;
        task.description = Some("now with details".to_string());
        assert!(store.update(task.clone()).unwrap());

        let stored = store.get(&task.id).unwrap();
        assert_eq!(stored.title, "after");
        assert_eq!(stored.priority, Priority::High);
        assert_eq!(stored.description.as_deref(), Some("now with details"));
    }

    #[test]
    fn update_unknown_id_is_a_silent_noop() {
        let mut store = TaskStore::in_memory();
        let mut task = store.add(&draft("kept")).unwrap();
        task.id = "missing".to_string();
        task.title = "never stored".to_string();

        assert!(!store.update(task).unwrap());
        assert_eq!(store.tasks()[0].title, "kept");
    }

    #[test]
    fn persist_and_reopen_round_trips_the_list() {
        let temp = TempDir::new().unwrap();

        let mut store = TaskStore::open(Box::new(FileStore::new(temp.path()))).unwrap();
        let mut with_due = draft("due soon");
        with_due.due_date = Some(chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
        with_due.description = Some("bring the charger".to_string());
        store.add(&with_due).unwrap();
        store.add(&draft("plain")).unwrap();
        let before: Vec<Task> = store.tasks().to_vec();
        drop(store);

        let reopened = TaskStore::open(Box::new(FileStore::new(temp.path()))).unwrap();
        assert_eq!(reopened.tasks(), before.as_slice());
    }

    #[test]
    fn open_with_absent_snapshot_starts_empty() {
        let store = TaskStore::in_memory();
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_snapshot_falls_back_to_empty_without_rewriting() {
        let temp = TempDir::new().unwrap();
        let files = FileStore::new(temp.path());
        files.set(TASKS_KEY, "{ not json").unwrap();

        let store = TaskStore::open(Box::new(FileStore::new(temp.path()))).unwrap();
        assert!(store.is_empty());

        // The corrupt value survives until the next mutation.
        assert_eq!(files.get(TASKS_KEY).unwrap().as_deref(), Some("{ not json"));
    }

    #[test]
    fn first_mutation_after_fallback_overwrites_corrupt_snapshot() {
        let temp = TempDir::new().unwrap();
        let files = FileStore::new(temp.path());
        files.set(TASKS_KEY, "{ not json").unwrap();

        let mut store = TaskStore::open(Box::new(FileStore::new(temp.path()))).unwrap();
        store.add(&draft("fresh start")).unwrap();

        let reopened = TaskStore::open(Box::new(FileStore::new(temp.path()))).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.tasks()[0].title, "fresh start");
    }

    #[test]
    fn hydration_normalizes_legacy_empty_descriptions() {
        let temp = TempDir::new().unwrap();
        let files = FileStore::new(temp.path());
        files
            .set(
                TASKS_KEY,
                r#"[{
                    "id": "t1",
                    "title": "Legacy",
                    "description": "",
                    "completed": false,
                    "priority": "low",
                    "category": "other",
                    "createdAt": "2026-01-01T00:00:00Z"
                }]"#,
            )
            .unwrap();

        let store = TaskStore::open(Box::new(FileStore::new(temp.path()))).unwrap();
        assert!(store.tasks()[0].description.is_none());

        // Open rewrites a well-formed snapshot in normalized form.
        let raw = files.get(TASKS_KEY).unwrap().unwrap();
        assert!(!raw.contains("description"));
    }
}
