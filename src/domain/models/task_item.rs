//! Task item domain model.
//!
//! Tasks are the primary records of the tracker. They are ordered newest
//! first by identifier everywhere they are listed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::CachedRecord;
use crate::domain::errors::{DomainError, DomainResult};

/// Maximum accepted length of a task title.
pub const MAX_TITLE_LEN: usize = 200;

/// Progress of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "not_started" | "notstarted" | "todo" => Some(Self::NotStarted),
            "in_progress" | "inprogress" => Some(Self::InProgress),
            "completed" | "complete" | "done" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority level for tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Default for PriorityLevel {
    fn default() -> Self {
        Self::Low
    }
}

impl PriorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" | "1" => Some(Self::Low),
            "medium" | "2" => Some(Self::Medium),
            "high" | "3" => Some(Self::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted task, in the shape it is cached and returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: PriorityLevel,
    pub status: TaskStatus,
}

impl TaskItem {
    /// Build the stored task for `id` from a draft.
    pub fn from_draft(id: i64, draft: TaskDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            priority: draft.priority,
            status: draft.status,
        }
    }

    /// Overwrite every mutable field with the draft's values.
    pub fn apply(&mut self, draft: TaskDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.due_date = draft.due_date;
        self.priority = draft.priority;
        self.status = draft.status;
    }
}

impl CachedRecord for TaskItem {
    const ITEM_KEY_PREFIX: &'static str = "TaskItem";
    const PAGE_KEY_PREFIX: &'static str = "TaskItems";

    fn id(&self) -> i64 {
        self.id
    }

    fn not_found(id: i64) -> DomainError {
        DomainError::TaskNotFound(id)
    }
}

/// Caller-supplied fields for creating or replacing a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub priority: PriorityLevel,
    #[serde(default)]
    pub status: TaskStatus,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            due_date,
            priority: PriorityLevel::default(),
            status: TaskStatus::default(),
        }
    }

    pub fn with_priority(mut self, priority: PriorityLevel) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Reject drafts that cannot be stored.
    pub fn validate(&self) -> DomainResult<()> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DomainError::ValidationFailed("title cannot be empty".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::ValidationFailed(format!(
                "title exceeds {MAX_TITLE_LEN} characters"
            )));
        }
        Ok(())
    }
}
