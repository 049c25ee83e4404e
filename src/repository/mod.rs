pub mod storage;
pub mod subtask_repository;
pub mod task_repository;

use std::sync::Arc;

use storage::Storage;

pub(crate) const TASKS_KEY: &str = "tasks";
pub(crate) const SUBTASKS_KEY: &str = "subtasks";

#[derive(Clone)]
pub struct Repository {
    pub storage: Arc<Storage>,
    pub tasks: task_repository::TaskRepository,
    pub subtasks: subtask_repository::SubtaskRepository,
}

impl Repository {
    pub fn new(storage: Storage) -> Self {
        let storage = Arc::new(storage);
        Self {
            tasks: task_repository::TaskRepository::new(storage.clone()),
            subtasks: subtask_repository::SubtaskRepository::new(storage.clone()),
            storage,
        }
    }

    /// In-memory store for testing.
    pub fn new_memory() -> Self {
        Self::new(Storage::in_memory())
    }
}
