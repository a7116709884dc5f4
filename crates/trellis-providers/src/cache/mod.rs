//! Cache provider implementations
//!
//! - **moka** - in-process cache with per-entry TTL (`cache-moka`)
//! - **redis** - distributed cache for multi-instance deployments (`cache-redis`)

#[cfg(feature = "cache-moka")]
pub mod moka;
#[cfg(feature = "cache-redis")]
pub mod redis;

#[cfg(feature = "cache-moka")]
pub use self::moka::MokaCacheProvider;
#[cfg(feature = "cache-redis")]
pub use self::redis::RedisCacheProvider;
