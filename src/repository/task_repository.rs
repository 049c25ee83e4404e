use anyhow::Result;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::storage::Storage;
use super::{SUBTASKS_KEY, TASKS_KEY};
use crate::domain::task::{Subtask, Task, TaskError, TaskStatus};

#[derive(Clone)]
pub struct TaskRepository {
    storage: Arc<Storage>,
}

/// Optional criteria combined with AND semantics. The default value
/// matches every task.
#[derive(Debug, Clone, Default)]
pub struct TaskFilters {
    /// Case-insensitive substring match on the title.
    pub title: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// ISO prefix match, e.g. "2025-07" for a whole month.
    pub created_at: Option<String>,
    /// ISO prefix match on the start date.
    pub start_date: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TaskRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    fn load(&self) -> Result<Vec<Task>> {
        Ok(self.storage.get(TASKS_KEY)?.unwrap_or_default())
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        self.storage.set(TASKS_KEY, &tasks)
    }

    fn load_subtasks(&self) -> Result<Vec<Subtask>> {
        Ok(self.storage.get(SUBTASKS_KEY)?.unwrap_or_default())
    }

    /// Every subtask a task references must already be in the pool.
    fn ensure_subtasks_exist(&self, task: &Task) -> Result<()> {
        let pool = self.load_subtasks()?;
        for &id in &task.subtask_ids {
            if !pool.iter().any(|s| s.id == id) {
                return Err(TaskError::UnknownSubtask { id }.into());
            }
        }
        Ok(())
    }

    pub fn list(&self, filters: TaskFilters) -> Result<Vec<Task>> {
        let mut tasks = self.load()?;

        if let Some(title) = &filters.title {
            let needle = title.to_lowercase();
            tasks.retain(|t| t.title.to_lowercase().contains(&needle));
        }
        if let Some(category) = &filters.category {
            tasks.retain(|t| &t.category == category);
        }
        if let Some(prefix) = &filters.created_at {
            tasks.retain(|t| t.created_at.starts_with(prefix.as_str()));
        }
        if let Some(prefix) = &filters.start_date {
            tasks.retain(|t| t.start_date.starts_with(prefix.as_str()));
        }
        if let Some(status) = filters.status {
            tasks.retain(|t| t.status == status);
        }

        Ok(tasks)
    }

    pub fn get(&self, id: Uuid) -> Result<Option<Task>> {
        Ok(self.load()?.into_iter().find(|t| t.id == id))
    }

    pub fn create(&self, task: &Task) -> Result<()> {
        self.ensure_subtasks_exist(task)?;

        let mut tasks = self.load()?;
        tasks.push(task.clone());
        self.save(&tasks)?;
        debug!(task = %task.id, "created task");
        Ok(())
    }

    pub fn update(&self, task: &Task) -> Result<()> {
        self.ensure_subtasks_exist(task)?;

        let mut tasks = self.load()?;
        for slot in tasks.iter_mut() {
            if slot.id == task.id {
                *slot = task.clone();
            }
        }
        self.save(&tasks)
    }

    /// Removes the task and any pool subtasks no remaining task references.
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tasks = self.load()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        let removed = tasks.len() < before;
        self.save(&tasks)?;

        let mut pool = self.load_subtasks()?;
        pool.retain(|s| tasks.iter().any(|t| t.subtask_ids.contains(&s.id)));
        self.storage.set(SUBTASKS_KEY, &pool)?;

        if removed {
            debug!(task = %id, "deleted task");
        }
        Ok(removed)
    }

    pub fn delete_all(&self) -> Result<()> {
        self.storage.remove(TASKS_KEY)?;
        self.storage.remove(SUBTASKS_KEY)
    }

    /// Detaches and purges every subtask of one task.
    pub fn clear_subtasks(&self, task_id: Uuid) -> Result<()> {
        let mut tasks = self.load()?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == task_id) else {
            return Ok(());
        };
        let detached = std::mem::take(&mut task.subtask_ids);

        let mut pool = self.load_subtasks()?;
        pool.retain(|s| !detached.contains(&s.id));
        self.storage.set(SUBTASKS_KEY, &pool)?;
        self.save(&tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;

    fn task_in_category(title: &str, category: &str) -> Task {
        let mut task = Task::new_simple(title.to_string());
        task.category = category.to_string();
        task
    }

    #[test]
    fn test_create_and_get() {
        let repo = Repository::new_memory();
        let task = Task::new("Write report".to_string(), "Quarterly".to_string());

        repo.tasks.create(&task).unwrap();
        let found = repo.tasks.get(task.id).unwrap();
        assert_eq!(found, Some(task));
    }

    #[test]
    fn test_create_rejects_unknown_subtask() {
        let repo = Repository::new_memory();
        let mut task = Task::new_simple("Broken".to_string());
        task.subtask_ids = vec![99];

        let err = repo.tasks.create(&task).unwrap_err();
        assert!(err.to_string().contains("subtask 99"));
        assert!(repo.tasks.list(TaskFilters::default()).unwrap().is_empty());
    }

    #[test]
    fn test_update_replaces_matching_task() {
        let repo = Repository::new_memory();
        let mut task = Task::new_simple("Original".to_string());
        repo.tasks.create(&task).unwrap();

        task.title = "Updated".to_string();
        task.status = TaskStatus::InProgress;
        repo.tasks.update(&task).unwrap();

        let found = repo.tasks.get(task.id).unwrap().unwrap();
        assert_eq!(found.title, "Updated");
        assert_eq!(found.status, TaskStatus::InProgress);
    }

    #[test]
    fn test_delete_purges_orphaned_subtasks() {
        let repo = Repository::new_memory();
        let shared = Subtask { id: 1, text: "shared".to_string(), completed: false };
        let solo = Subtask { id: 2, text: "solo".to_string(), completed: false };
        repo.subtasks.add(&shared).unwrap();
        repo.subtasks.add(&solo).unwrap();

        let mut keeper = Task::new_simple("Keeper".to_string());
        keeper.subtask_ids = vec![1];
        let mut goner = Task::new_simple("Goner".to_string());
        goner.subtask_ids = vec![1, 2];
        repo.tasks.create(&keeper).unwrap();
        repo.tasks.create(&goner).unwrap();

        assert!(repo.tasks.delete(goner.id).unwrap());

        let pool = repo.subtasks.list().unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].id, 1);
    }

    #[test]
    fn test_delete_missing_task_returns_false() {
        let repo = Repository::new_memory();
        assert!(!repo.tasks.delete(Uuid::new_v4()).unwrap());
    }

    #[test]
    fn test_delete_all() {
        let repo = Repository::new_memory();
        repo.tasks.create(&Task::new_simple("One".to_string())).unwrap();
        repo.subtasks
            .add(&Subtask { id: 1, text: "s".to_string(), completed: false })
            .unwrap();

        repo.tasks.delete_all().unwrap();
        assert!(repo.tasks.list(TaskFilters::default()).unwrap().is_empty());
        assert!(repo.subtasks.list().unwrap().is_empty());
    }

    #[test]
    fn test_clear_subtasks() {
        let repo = Repository::new_memory();
        repo.subtasks
            .add(&Subtask { id: 7, text: "only".to_string(), completed: false })
            .unwrap();
        let mut task = Task::new_simple("Parent".to_string());
        task.subtask_ids = vec![7];
        repo.tasks.create(&task).unwrap();

        repo.tasks.clear_subtasks(task.id).unwrap();

        let found = repo.tasks.get(task.id).unwrap().unwrap();
        assert!(found.subtask_ids.is_empty());
        assert!(repo.subtasks.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_with_default_filters_returns_everything() {
        let repo = Repository::new_memory();
        for i in 0..3 {
            repo.tasks.create(&Task::new_simple(format!("Task {i}"))).unwrap();
        }
        assert_eq!(repo.tasks.list(TaskFilters::default()).unwrap().len(), 3);
    }

    #[test]
    fn test_filter_by_title_is_case_insensitive() {
        let repo = Repository::new_memory();
        repo.tasks.create(&Task::new_simple("Deploy Backend".to_string())).unwrap();
        repo.tasks.create(&Task::new_simple("Write docs".to_string())).unwrap();

        let filters = TaskFilters {
            title: Some("backend".to_string()),
            ..Default::default()
        };
        let tasks = repo.tasks.list(filters).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Deploy Backend");
    }

    #[test]
    fn test_filter_by_category_is_exact() {
        let repo = Repository::new_memory();
        repo.tasks.create(&task_in_category("A", "Work")).unwrap();
        repo.tasks.create(&task_in_category("B", "Workout")).unwrap();

        let filters = TaskFilters {
            category: Some("Work".to_string()),
            ..Default::default()
        };
        let tasks = repo.tasks.list(filters).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "A");
    }

    #[test]
    fn test_filter_by_date_prefix_and_status() {
        let repo = Repository::new_memory();
        let mut july = Task::new_simple("July".to_string());
        july.created_at = "2025-07-18T16:10:00Z".to_string();
        july.start_date = "2025-07-20".to_string();
        july.status = TaskStatus::Completed;
        let mut august = Task::new_simple("August".to_string());
        august.created_at = "2025-08-02T09:00:00Z".to_string();
        august.start_date = "2025-08-03".to_string();
        august.status = TaskStatus::Completed;
        repo.tasks.create(&july).unwrap();
        repo.tasks.create(&august).unwrap();

        let filters = TaskFilters {
            created_at: Some("2025-07".to_string()),
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let tasks = repo.tasks.list(filters).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "July");

        let filters = TaskFilters {
            start_date: Some("2025-08".to_string()),
            ..Default::default()
        };
        let tasks = repo.tasks.list(filters).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "August");
    }
}
