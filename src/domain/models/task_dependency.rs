//! Task dependency domain model.
//!
//! A dependency is a directed edge `task_id -> dependent_task_id` between two
//! tasks. The edge set is kept acyclic by the cycle guard.

use serde::{Deserialize, Serialize};

use super::record::CachedRecord;
use crate::domain::errors::DomainError;

/// A persisted dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskDependency {
    pub id: i64,
    /// Source of the edge.
    pub task_id: i64,
    /// Target of the edge.
    pub dependent_task_id: i64,
}

impl TaskDependency {
    pub fn new(id: i64, task_id: i64, dependent_task_id: i64) -> Self {
        Self {
            id,
            task_id,
            dependent_task_id,
        }
    }

    /// The `(source, target)` pair of this edge.
    pub fn endpoints(&self) -> (i64, i64) {
        (self.task_id, self.dependent_task_id)
    }
}

impl CachedRecord for TaskDependency {
    const ITEM_KEY_PREFIX: &'static str = "TaskDependency";
    const PAGE_KEY_PREFIX: &'static str = "TaskDependencies";

    fn id(&self) -> i64 {
        self.id
    }

    fn not_found(id: i64) -> DomainError {
        DomainError::DependencyNotFound(id)
    }
}

/// Caller-supplied endpoints for creating or replacing an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDraft {
    pub task_id: i64,
    pub dependent_task_id: i64,
}

impl DependencyDraft {
    pub fn new(task_id: i64, dependent_task_id: i64) -> Self {
        Self {
            task_id,
            dependent_task_id,
        }
    }
}
