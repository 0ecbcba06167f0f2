//! tasktrack - task tracker with a paged read-through cache
//!
//! Tasks and the dependency edges between them are stored in `SQLite` and
//! served over a REST API and a CLI. Listings are paged newest first, and the
//! pages for the default page size are kept in a key-value cache that every
//! write updates in place instead of invalidating.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): records, errors and port traits
//! - **Service Layer** (`services`): the paged cache, cycle guard and the
//!   task and dependency services
//! - **Adapters** (`adapters`): `SQLite` repositories, cache stores and the
//!   axum REST surface
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging and
//!   application wiring
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use tasktrack::infrastructure::{config::ConfigLoader, AppContext};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let ctx = AppContext::open(ConfigLoader::load()?).await?;
//!     let newest = ctx.tasks.list_tasks(None, None).await?;
//!     println!("{} tasks on the first page", newest.len());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::models::{
    CacheConfig, Config, DatabaseConfig, DependencyDraft, LoggingConfig, PriorityLevel, ServerConfig,
    TaskDependency, TaskDraft, TaskItem, TaskStatus,
};
pub use domain::ports::{CacheStore, DependencyRepository, RecordRepository, TaskRepository};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::AppContext;
pub use services::{CycleGuard, DependencyService, PagedCache, TaskService};
