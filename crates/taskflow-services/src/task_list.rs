//! In-memory task collection kept in step with a persistent store.
//!
//! `TaskList` owns the tasks. Every operation that changes the collection
//! writes the new collection under the list's key first and adopts it only
//! once the write succeeds, so the stored copy and the in-memory copy stay
//! equal even when a write fails. Operations that change nothing don't write.

use std::collections::HashSet;

use crate::store::{self, KeyValueStore, StoreResult};
use crate::task::{FilterMode, Task};

/// Key the collection is stored under unless configured otherwise.
pub const DEFAULT_KEY: &str = "todos";

/// The sample tasks shown on first launch.
pub fn default_tasks() -> Vec<Task> {
    vec![
        Task::new("1", "Build a stunning UI", true),
        Task::new("2", "Integrate local storage", true),
        Task::new("3", "Add edit and delete functionality", false),
        Task::new("4", "Deploy the final app", false),
    ]
}

/// Tasks matching `mode`, in their original order.
pub fn filter(tasks: &[Task], mode: FilterMode) -> Vec<&Task> {
    tasks.iter().filter(|t| mode.matches(t)).collect()
}

pub struct TaskList<S: KeyValueStore> {
    store: S,
    key: String,
    tasks: Vec<Task>,
}

impl<S: KeyValueStore> TaskList<S> {
    /// Open the list under [`DEFAULT_KEY`], seeding it with [`default_tasks`]
    /// on first use.
    ///
    /// # Errors
    /// See [`TaskList::open_with_default`].
    pub fn open(store: S) -> StoreResult<Self> {
        Self::open_with_default(store, DEFAULT_KEY, default_tasks())
    }

    /// Open the list stored under `key`, falling back to `default` when
    /// nothing usable is stored there.
    ///
    /// Duplicate ids in stored data are dropped (first occurrence wins) and
    /// the cleaned collection is written back.
    ///
    /// # Errors
    /// Returns `StoreError::InvalidKey` for an unusable key, or the store's
    /// error if writing back a cleaned collection fails.
    pub fn open_with_default(
        store: S,
        key: impl Into<String>,
        default: Vec<Task>,
    ) -> StoreResult<Self> {
        let key = key.into();
        store::validate_key(&key)?;

        let loaded: Vec<Task> = store::read(&store, &key, default);
        let mut seen = HashSet::with_capacity(loaded.len());
        let before = loaded.len();
        let tasks: Vec<Task> = loaded
            .into_iter()
            .filter(|t| seen.insert(t.id.clone()))
            .collect();

        let list = Self { store, key, tasks };
        if list.tasks.len() != before {
            tracing::warn!(
                dropped = before - list.tasks.len(),
                "Dropped tasks with duplicate ids"
            );
            list.persist()?;
        }

        tracing::debug!(key = %list.key, count = list.tasks.len(), "Opened task list");
        Ok(list)
    }

    /// All tasks, in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Number of tasks not yet completed.
    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    /// Tasks matching `mode`, in order.
    pub fn filtered(&self, mode: FilterMode) -> Vec<&Task> {
        filter(&self.tasks, mode)
    }

    /// Append a new, not-completed task.
    ///
    /// Returns `None` without touching anything when `text` is blank.
    ///
    /// # Errors
    /// Returns the store's error if the collection can't be saved.
    pub fn add(&mut self, text: &str) -> StoreResult<Option<&Task>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let task = Task::new(self.fresh_id(), text, false);
        tracing::debug!(id = %task.id, "Adding task");
        let mut next = self.tasks.clone();
        next.push(task);
        self.commit(next)?;
        Ok(self.tasks.last())
    }

    /// Flip the completion flag of task `id`. Unknown ids are ignored.
    ///
    /// # Errors
    /// Returns the store's error if the collection can't be saved.
    pub fn toggle(&mut self, id: &str) -> StoreResult<Option<&Task>> {
        let Some(index) = self.position(id) else {
            tracing::debug!(id, "Toggle ignored, no such task");
            return Ok(None);
        };

        let mut next = self.tasks.clone();
        next[index].completed = !next[index].completed;
        tracing::debug!(id, completed = next[index].completed, "Toggling task");
        self.commit(next)?;
        Ok(self.tasks.get(index))
    }

    /// Remove task `id`, returning it. Unknown ids are ignored.
    ///
    /// # Errors
    /// Returns the store's error if the collection can't be saved.
    pub fn delete(&mut self, id: &str) -> StoreResult<Option<Task>> {
        let Some(index) = self.position(id) else {
            tracing::debug!(id, "Delete ignored, no such task");
            return Ok(None);
        };

        let mut next = self.tasks.clone();
        let removed = next.remove(index);
        tracing::debug!(id, "Deleting task");
        self.commit(next)?;
        Ok(Some(removed))
    }

    /// Replace the text of task `id`.
    ///
    /// Blank `new_text` or an unknown id leaves everything unchanged and
    /// returns `None`.
    ///
    /// # Errors
    /// Returns the store's error if the collection can't be saved.
    pub fn edit(&mut self, id: &str, new_text: &str) -> StoreResult<Option<&Task>> {
        if new_text.trim().is_empty() {
            return Ok(None);
        }
        let Some(index) = self.position(id) else {
            tracing::debug!(id, "Edit ignored, no such task");
            return Ok(None);
        };

        let mut next = self.tasks.clone();
        next[index].text = new_text.to_string();
        tracing::debug!(id, "Editing task");
        self.commit(next)?;
        Ok(self.tasks.get(index))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    fn persist(&self) -> StoreResult<()> {
        store::write(&self.store, &self.key, &self.tasks)
    }

    /// Store `next`, and only then make it the in-memory collection.
    fn commit(&mut self, next: Vec<Task>) -> StoreResult<()> {
        store::write(&self.store, &self.key, &next)?;
        self.tasks = next;
        Ok(())
    }
}
