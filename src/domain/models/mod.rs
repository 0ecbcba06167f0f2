//! Domain models for tasks, dependencies and configuration.

pub mod config;
pub mod record;
pub mod task_dependency;
pub mod task_item;

pub use config::{CacheConfig, Config, DatabaseConfig, LoggingConfig, ServerConfig};
pub use record::{item_key, page_key, CachedRecord};
pub use task_dependency::{DependencyDraft, TaskDependency};
pub use task_item::{PriorityLevel, TaskDraft, TaskItem, TaskStatus};
