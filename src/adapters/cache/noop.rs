//! Cache store that never stores anything.
//!
//! Every read misses, so every read goes to the source of truth.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::ports::{CacheResult, CacheStore};

#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCacheStore;

impl NoOpCacheStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheStore for NoOpCacheStore {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> CacheResult<bool> {
        Ok(true)
    }

    fn provider_name(&self) -> &'static str {
        "noop"
    }
}
