//! In-process cache store backed by `moka`.
//!
//! Entries share the cache-level TTL set at construction. The per-write TTL
//! passed to [`CacheStore::set`] is ignored, which is fine as long as callers
//! always pass the configured TTL.

use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::domain::models::CacheConfig;
use crate::domain::ports::{CacheResult, CacheStore};

#[derive(Clone)]
pub struct MokaCacheStore {
    cache: Cache<String, String>,
    ttl: Duration,
}

impl std::fmt::Debug for MokaCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCacheStore")
            .field("max_capacity", &self.cache.policy().max_capacity())
            .field("entry_count", &self.cache.entry_count())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl MokaCacheStore {
    /// Store holding at most `max_capacity` entries, each living `ttl`.
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        debug!(max_capacity, ttl_seconds = ttl.as_secs(), "moka cache store created");
        Self { cache, ttl }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_capacity, config.ttl())
    }

    /// Number of live entries, after pending maintenance has run.
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

#[async_trait]
impl CacheStore for MokaCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.cache.get(key).await)
    }

    async fn set(&self, key: &str, value: &str, _ttl: Duration) -> CacheResult<()> {
        self.cache.insert(key.to_string(), value.to_string()).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn health_check(&self) -> CacheResult<bool> {
        Ok(true)
    }

    fn provider_name(&self) -> &'static str {
        "moka"
    }
}
