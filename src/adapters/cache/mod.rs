//! Key/value stores backing the paged read cache.

pub mod moka;
pub mod noop;
pub mod provider;
pub mod redis;

pub use self::moka::MokaCacheStore;
pub use self::redis::RedisCacheStore;
pub use noop::NoOpCacheStore;
pub use provider::CacheProvider;
