//! Cache store selected from configuration.
//!
//! Enum dispatch over the available backends, so services can hold one
//! concrete store type regardless of what the config picked.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

use super::moka::MokaCacheStore;
use super::noop::NoOpCacheStore;
use super::redis::RedisCacheStore;
use crate::domain::models::CacheConfig;
use crate::domain::ports::{CacheResult, CacheStore};

#[derive(Debug, Clone)]
pub enum CacheProvider {
    Moka(Box<MokaCacheStore>),
    Redis(Box<RedisCacheStore>),
    NoOp(NoOpCacheStore),
}

impl CacheProvider {
    /// Build the configured backend.
    ///
    /// An unknown backend name, or a redis server that cannot be reached,
    /// falls back to no caching; reads still work, they just always hit the
    /// database.
    pub async fn from_config(config: &CacheConfig) -> Self {
        let provider = match config.backend.to_lowercase().as_str() {
            "moka" | "memory" => Self::Moka(Box::new(MokaCacheStore::from_config(config))),
            "redis" => match RedisCacheStore::from_config(config).await {
                Ok(store) => Self::Redis(Box::new(store)),
                Err(e) => {
                    warn!(error = %e, "redis unavailable, caching disabled");
                    Self::NoOp(NoOpCacheStore::new())
                }
            },
            "noop" | "none" | "disabled" => Self::NoOp(NoOpCacheStore::new()),
            other => {
                warn!(backend = other, "unknown cache backend, caching disabled");
                Self::NoOp(NoOpCacheStore::new())
            }
        };
        info!(
            provider = provider.provider_name(),
            ttl_seconds = config.ttl_seconds,
            "cache provider ready"
        );
        provider
    }

    /// Whether writes are kept at all.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::NoOp(_))
    }

    /// Whether entries outlive this process and are seen by other processes.
    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Redis(_))
    }
}

#[async_trait]
impl CacheStore for CacheProvider {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        match self {
            Self::Moka(s) => s.get(key).await,
            Self::Redis(s) => s.get(key).await,
            Self::NoOp(s) => s.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        match self {
            Self::Moka(s) => s.set(key, value, ttl).await,
            Self::Redis(s) => s.set(key, value, ttl).await,
            Self::NoOp(s) => s.set(key, value, ttl).await,
        }
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        match self {
            Self::Moka(s) => s.delete(key).await,
            Self::Redis(s) => s.delete(key).await,
            Self::NoOp(s) => s.delete(key).await,
        }
    }

    async fn health_check(&self) -> CacheResult<bool> {
        match self {
            Self::Moka(s) => s.health_check().await,
            Self::Redis(s) => s.health_check().await,
            Self::NoOp(s) => s.health_check().await,
        }
    }

    fn provider_name(&self) -> &'static str {
        match self {
            Self::Moka(s) => s.provider_name(),
            Self::Redis(s) => s.provider_name(),
            Self::NoOp(s) => s.provider_name(),
        }
    }
}
