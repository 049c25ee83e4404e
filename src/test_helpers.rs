// Test helpers for integration testing

use std::sync::Arc;

use crate::domain::task::{Task, TaskStatus};
use crate::repository::Repository;

pub struct TestContext {
    pub repository: Arc<Repository>,
}

impl TestContext {
    pub fn new_for_test() -> Self {
        let repository = Arc::new(Repository::new_memory());
        Self { repository }
    }
}

/// A task with every date field set from plain `YYYY-MM-DD` strings;
/// pass "" to leave one unset.
pub fn dated_task(
    title: &str,
    status: TaskStatus,
    created: &str,
    start: &str,
    estimated: &str,
    real: &str,
) -> Task {
    let mut task = Task::new_simple(title.to_string());
    task.status = status;
    task.created_at = created.to_string();
    task.start_date = start.to_string();
    task.estimated_end_date = estimated.to_string();
    task.real_end_date = if real.is_empty() {
        None
    } else {
        Some(real.to_string())
    };
    task
}
