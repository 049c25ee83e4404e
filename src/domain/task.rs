use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("unknown status id: {0}")]
    UnknownStatus(u8),

    #[error("subtask {id} does not exist")]
    UnknownSubtask { id: i64 },
}

/// A to-do item as it is persisted in the store.
///
/// The date fields are kept as the raw strings they were entered with
/// (RFC 3339 datetimes or plain `YYYY-MM-DD`). They may be empty or
/// unparseable; the stats engine degrades per-metric instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: String,
    pub start_date: String,
    pub estimated_end_date: String,
    #[serde(default)]
    pub real_end_date: Option<String>,
    pub category: String,
    pub status: TaskStatus,
    pub tags: Vec<String>,
    pub subtask_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subtask {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

/// Task lifecycle states. The numeric ids are the persisted
/// representation and are fixed by convention.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "u8", try_from = "u8")]
pub enum TaskStatus {
    Pending = 1,
    InProgress = 2,
    Completed = 3,
    Canceled = 4,
}

impl TaskStatus {
    pub fn all() -> [TaskStatus; 4] {
        [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Canceled,
        ]
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Canceled => "Canceled",
        }
    }
}

impl From<TaskStatus> for u8 {
    fn from(status: TaskStatus) -> u8 {
        status as u8
    }
}

impl TryFrom<u8> for TaskStatus {
    type Error = TaskError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(TaskStatus::Pending),
            2 => Ok(TaskStatus::InProgress),
            3 => Ok(TaskStatus::Completed),
            4 => Ok(TaskStatus::Canceled),
            other => Err(TaskError::UnknownStatus(other)),
        }
    }
}

impl Default for Task {
    fn default() -> Self {
        Self::new(String::new(), String::new())
    }
}

impl Task {
    pub fn new(title: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            created_at: Utc::now().to_rfc3339(),
            start_date: String::new(),
            estimated_end_date: String::new(),
            real_end_date: None,
            category: String::new(),
            status: TaskStatus::Pending,
            tags: Vec::new(),
            subtask_ids: Vec::new(),
        }
    }

    pub fn new_simple(title: String) -> Self {
        Self::new(title, String::new())
    }

    pub fn update_status(&mut self, status: TaskStatus) {
        self.status = status;

        if status == TaskStatus::Completed {
            if self.real_end_date.is_none() {
                self.real_end_date = Some(Utc::now().to_rfc3339());
            }
        } else {
            self.real_end_date = None;
        }
    }

    pub fn add_tag(&mut self, tag: String) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() < before
    }
}
