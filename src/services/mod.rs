//! Application services for tasks and dependencies.

pub mod cycle_guard;
pub mod dependency_service;
pub mod paged_cache;
pub mod pagination;
pub mod task_service;

pub use cycle_guard::CycleGuard;
pub use dependency_service::DependencyService;
pub use paged_cache::{PagedCache, DEFAULT_PAGE_SIZE, DEFAULT_TTL};
pub use pagination::PagePolicy;
pub use task_service::TaskService;
