//! Cache Provider Port
//!
//! Port for cache backend providers. Values are stored as JSON strings with an
//! optional time to live. Backends: in-memory (Moka) and distributed (Redis).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Cache Entry Configuration
///
/// # Example
///
/// ```
/// use trellis_domain::ports::CacheEntryConfig;
/// use std::time::Duration;
///
/// let config = CacheEntryConfig::default().with_ttl(Duration::from_secs(120));
/// assert_eq!(config.ttl, Some(Duration::from_secs(120)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntryConfig {
    /// Time to live; `None` keeps the entry until evicted
    pub ttl: Option<Duration>,
}

impl CacheEntryConfig {
    /// Set the TTL for the cache entry
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// Cache Provider Port
///
/// # Example
///
/// ```ignore
/// let config = CacheEntryConfig::default().with_ttl(Duration::from_secs(300));
/// cache.set_json("Users@1", &user_json, config).await?;
///
/// if let Some(json) = cache.get_json("Users@1").await? {
///     let user: UserView = serde_json::from_str(&json)?;
/// }
/// ```
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug {
    /// Get a value as JSON string; `None` if absent or expired
    async fn get_json(&self, key: &str) -> Result<Option<String>>;

    /// Store a JSON string
    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()>;

    /// Delete a value; `true` if it existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Check if a key exists and hasn't expired
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Clear all values
    async fn clear(&self) -> Result<()>;

    /// Approximate number of entries
    async fn size(&self) -> Result<usize>;

    /// Release backend resources on shutdown
    async fn close(&self) -> Result<()> {
        Ok(())
    }

    /// Provider name, e.g. `"moka"`
    fn provider_name(&self) -> &str;
}
