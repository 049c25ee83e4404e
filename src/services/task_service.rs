use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::task::{Subtask, Task};
use crate::repository::Repository;
use crate::repository::task_repository::TaskFilters;

#[derive(Clone)]
pub struct TaskService {
    pub repository: Arc<Repository>,
}

impl TaskService {
    pub fn new(repository: Arc<Repository>) -> Self {
        Self { repository }
    }

    pub fn create(&self, task: Task) -> Result<Task> {
        self.repository.tasks.create(&task)?;
        Ok(task)
    }

    pub fn update(&self, task: Task) -> Result<Task> {
        self.repository.tasks.update(&task)?;
        Ok(task)
    }

    pub fn get(&self, id: Uuid) -> Result<Option<Task>> {
        self.repository.tasks.get(id)
    }

    pub fn delete(&self, id: Uuid) -> Result<bool> {
        self.repository.tasks.delete(id)
    }

    pub fn list_all(&self) -> Result<Vec<Task>> {
        self.repository.tasks.list(TaskFilters::default())
    }

    pub fn list(&self, filters: TaskFilters) -> Result<Vec<Task>> {
        self.repository.tasks.list(filters)
    }

    pub fn add_subtask(&self, subtask: Subtask, task_id: Uuid) -> Result<()> {
        self.repository.subtasks.add(&subtask)?;
        if let Some(mut task) = self.repository.tasks.get(task_id)? {
            if !task.subtask_ids.contains(&subtask.id) {
                task.subtask_ids.push(subtask.id);
                self.repository.tasks.update(&task)?;
            }
        }
        Ok(())
    }

    pub fn update_subtask(&self, subtask: Subtask) -> Result<()> {
        self.repository.subtasks.update(&subtask)
    }

    pub fn delete_subtask(&self, id: i64) -> Result<()> {
        self.repository.subtasks.delete(id)
    }

    pub fn list_subtasks(&self) -> Result<Vec<Subtask>> {
        self.repository.subtasks.list()
    }
}
