use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use super::storage::Storage;
use super::{SUBTASKS_KEY, TASKS_KEY};
use crate::domain::task::{Subtask, Task};

#[derive(Clone)]
pub struct SubtaskRepository {
    storage: Arc<Storage>,
}

impl SubtaskRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    fn load(&self) -> Result<Vec<Subtask>> {
        Ok(self.storage.get(SUBTASKS_KEY)?.unwrap_or_default())
    }

    fn save(&self, subtasks: &[Subtask]) -> Result<()> {
        self.storage.set(SUBTASKS_KEY, &subtasks)
    }

    pub fn list(&self) -> Result<Vec<Subtask>> {
        self.load()
    }

    pub fn get(&self, id: i64) -> Result<Option<Subtask>> {
        Ok(self.load()?.into_iter().find(|s| s.id == id))
    }

    /// Adds to the pool; an already-present id is left untouched.
    pub fn add(&self, subtask: &Subtask) -> Result<()> {
        let mut pool = self.load()?;
        if pool.iter().any(|s| s.id == subtask.id) {
            return Ok(());
        }
        pool.push(subtask.clone());
        self.save(&pool)?;
        debug!(subtask = subtask.id, "added subtask");
        Ok(())
    }

    pub fn update(&self, subtask: &Subtask) -> Result<()> {
        let mut pool = self.load()?;
        for slot in pool.iter_mut() {
            if slot.id == subtask.id {
                *slot = subtask.clone();
            }
        }
        self.save(&pool)
    }

    /// Removes from the pool and strips the id from every task.
    pub fn delete(&self, id: i64) -> Result<()> {
        let mut pool = self.load()?;
        pool.retain(|s| s.id != id);
        self.save(&pool)?;

        let mut tasks: Vec<Task> = self.storage.get(TASKS_KEY)?.unwrap_or_default();
        for task in tasks.iter_mut() {
            task.subtask_ids.retain(|&sid| sid != id);
        }
        self.storage.set(TASKS_KEY, &tasks)
    }
}
