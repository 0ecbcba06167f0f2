//! Key/value store port backing the paged read cache.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to reach the cache backend
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    /// Failed to serialize or deserialize a cached value
    #[error("Cache serialization error: {0}")]
    SerializationError(String),

    /// Generic backend error
    #[error("Cache backend error: {0}")]
    BackendError(String),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Key/value storage with per-write TTL.
///
/// Each call is atomic on its own; sequences of calls are not.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns `Ok(Some(value))` on a hit, `Ok(None)` on a miss.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store a value that expires after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Remove a key. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Check if the backend is healthy
    async fn health_check(&self) -> CacheResult<bool>;

    /// Name of the backend, for logs and diagnostics
    fn provider_name(&self) -> &'static str;
}
