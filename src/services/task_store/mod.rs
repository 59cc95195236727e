// Task store service
// The narrow read/write interface the drag engine commits through, plus an
// in-memory implementation with JSON snapshots

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::models::task::{Task, TaskId, TaskPatch};

mod sqlite;

pub use sqlite::SqliteTaskStore;

/// Canonical owner of task records.
///
/// The engine reads one snapshot at pointer-down and writes at most one
/// partial update per gesture.
#[cfg_attr(test, mockall::automock)]
pub trait TaskStore {
    fn get_task(&self, id: TaskId) -> Option<Task>;

    /// Apply `patch` to the stored task. Fields the patch leaves as `None` are untouched.
    fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: BTreeMap<TaskId, Task>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            tasks: tasks.into_iter().map(|task| (task.id, task)).collect(),
        }
    }

    pub fn insert(&mut self, task: Task) {
        self.tasks.insert(task.id, task);
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Load a store from a JSON array of tasks. A missing file yields an empty store.
    pub fn load_snapshot(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read tasks from {}", path.display()))?;
        let tasks: Vec<Task> = serde_json::from_str(&data)
            .with_context(|| format!("failed to deserialize tasks from {}", path.display()))?;
        Ok(Self::with_tasks(tasks))
    }

    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }

        let tasks: Vec<&Task> = self.tasks.values().collect();
        let data = serde_json::to_string_pretty(&tasks)?;
        fs::write(path, data)
            .with_context(|| format!("failed to write tasks to {}", path.display()))?;
        Ok(())
    }
}

impl TaskStore for InMemoryTaskStore {
    fn get_task(&self, id: TaskId) -> Option<Task> {
        self.tasks.get(&id).cloned()
    }

    fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<()> {
        let task = self
            .tasks
            .get_mut(&id)
            .ok_or_else(|| anyhow!("task {} not found", id))?;
        patch.apply_to(task);
        Ok(())
    }
}
