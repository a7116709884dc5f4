//! # Provider Implementations
//!
//! Adapters implementing the domain ports:
//!
//! | Module | Port | Providers |
//! |--------|------|-----------|
//! | [`cache`] | `CacheProvider` | Moka (in-memory, per-entry TTL), Redis |
//! | [`permission`] | `PermissionProvider` | In-memory role graph |
//!
//! Cache providers register themselves into the application layer's
//! `CACHE_PROVIDERS` slice and are selected by name from configuration.
//! Linking this crate is enough to make them resolvable.

pub mod cache;
pub mod constants;
pub mod permission;

#[cfg(feature = "cache-moka")]
pub use cache::MokaCacheProvider;
#[cfg(feature = "cache-redis")]
pub use cache::RedisCacheProvider;
#[cfg(feature = "permission-memory")]
pub use permission::InMemoryPermissionProvider;
