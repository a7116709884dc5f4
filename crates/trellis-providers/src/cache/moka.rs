//! Moka in-memory cache provider
//!
//! Concurrent in-process cache. Unlike a cache-wide TTL, every entry expires
//! after the TTL it was stored with, so session markers and cached responses
//! can share one cache.
//!
//! ## Example
//!
//! ```ignore
//! use trellis_providers::cache::MokaCacheProvider;
//!
//! let provider = MokaCacheProvider::with_capacity(1_000);
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use trellis_application::ports::registry::{
    CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry,
};
use trellis_domain::error::{Error, Result};
use trellis_domain::ports::{CacheEntryConfig, CacheProvider};

use crate::constants::CACHE_DEFAULT_CAPACITY;

#[derive(Clone)]
struct CachedValue {
    json: Arc<str>,
    ttl: Option<Duration>,
}

struct EntryExpiry;

impl Expiry<String, CachedValue> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// Moka-based in-memory cache provider
#[derive(Clone)]
pub struct MokaCacheProvider {
    cache: Cache<String, CachedValue>,
    max_capacity: u64,
}

impl Default for MokaCacheProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MokaCacheProvider {
    /// Create a new Moka cache provider with default capacity
    pub fn new() -> Self {
        Self::with_capacity(CACHE_DEFAULT_CAPACITY)
    }

    /// Create a new Moka cache provider holding at most `max_capacity` entries
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryExpiry)
            .build();

        Self {
            cache,
            max_capacity,
        }
    }

    /// Maximum number of entries
    pub fn max_capacity(&self) -> u64 {
        self.max_capacity
    }
}

#[async_trait]
impl CacheProvider for MokaCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cache.get(key).await.map(|value| value.json.to_string()))
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        if config.ttl.is_some_and(|ttl| ttl.is_zero()) {
            return Err(Error::Infrastructure {
                message: format!("Refusing to store \"{key}\" with a zero TTL"),
                source: None,
            });
        }
        let entry = CachedValue {
            json: Arc::from(value),
            ttl: config.ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.cache.contains_key(key))
    }

    async fn clear(&self) -> Result<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn size(&self) -> Result<usize> {
        // Run pending tasks to ensure entry_count is accurate
        self.cache.run_pending_tasks().await;
        Ok(usize::try_from(self.cache.entry_count()).unwrap_or(usize::MAX))
    }

    async fn close(&self) -> Result<()> {
        self.clear().await
    }

    fn provider_name(&self) -> &str {
        "moka"
    }
}

impl std::fmt::Debug for MokaCacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCacheProvider")
            .field("max_capacity", &self.max_capacity)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static MOKA_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "moka",
    description: "Moka in-memory cache with per-entry TTL",
    factory: |config: &CacheProviderConfig| {
        let provider = config
            .max_size
            .map_or_else(MokaCacheProvider::new, MokaCacheProvider::with_capacity);
        Ok(Arc::new(provider))
    },
};
