//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - RecordRepository: ordered, sliced reads over one record kind
//! - TaskRepository / DependencyRepository: writes to the source of truth
//! - CacheStore: key/value storage with TTL backing the paged read cache

pub mod cache_store;
pub mod dependency_repository;
pub mod record_repository;
pub mod task_repository;

pub use cache_store::{CacheError, CacheResult, CacheStore};
pub use dependency_repository::DependencyRepository;
pub use record_repository::RecordRepository;
pub use task_repository::TaskRepository;
