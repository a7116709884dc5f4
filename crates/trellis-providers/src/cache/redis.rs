//! Redis distributed cache provider
//!
//! Suitable for multi-instance deployments: session markers written by one
//! instance are visible to all others.
//!
//! ## Example
//!
//! ```ignore
//! use trellis_providers::cache::RedisCacheProvider;
//!
//! let provider = RedisCacheProvider::new("redis://localhost:6379")?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tokio::sync::Mutex;
use tracing::debug;
use trellis_application::ports::registry::{
    CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry,
};
use trellis_domain::error::{Error, Result};
use trellis_domain::ports::{CacheEntryConfig, CacheProvider};

use crate::constants::REDIS_DEFAULT_URI;

/// Redis cache provider
///
/// One [`ConnectionManager`] is opened on first use and shared by every
/// request; [`close`](CacheProvider::close) drops it.
#[derive(Clone)]
pub struct RedisCacheProvider {
    client: Client,
    uri: String,
    manager: Arc<Mutex<Option<ConnectionManager>>>,
}

impl RedisCacheProvider {
    /// Create a new Redis cache provider with connection string
    pub fn new(connection_string: &str) -> Result<Self> {
        let client = Client::open(connection_string).map_err(|e| Error::Infrastructure {
            message: format!("Failed to create Redis client: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            client,
            uri: connection_string.to_string(),
            manager: Arc::new(Mutex::new(None)),
        })
    }

    /// Whether the shared connection is open
    pub async fn is_connected(&self) -> bool {
        self.manager.lock().await.is_some()
    }

    async fn get_connection(&self) -> Result<ConnectionManager> {
        let mut manager = self.manager.lock().await;
        if let Some(connection) = manager.as_ref() {
            return Ok(connection.clone());
        }
        let connection = ConnectionManager::new(self.client.clone())
            .await
            .map_err(|e| redis_error("connect", e))?;
        debug!(uri = %self.uri, "redis connection opened");
        *manager = Some(connection.clone());
        Ok(connection)
    }
}

fn redis_error(operation: &str, e: redis::RedisError) -> Error {
    Error::Infrastructure {
        message: format!("Redis {operation} failed: {e}"),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.get_connection().await?;
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| redis_error("GET", e))
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        let mut conn = self.get_connection().await?;

        let result: redis::RedisResult<()> = match config.ttl.map(|ttl| ttl.as_secs()) {
            Some(0) => {
                return Err(Error::Infrastructure {
                    message: format!("Refusing to store \"{key}\" with a sub-second TTL"),
                    source: None,
                });
            }
            Some(seconds) => conn.set_ex(key, value, seconds).await,
            None => conn.set(key, value).await,
        };
        result.map_err(|e| redis_error("SET", e))
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let deleted: i64 = conn.del(key).await.map_err(|e| redis_error("DEL", e))?;
        Ok(deleted > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        conn.exists(key).await.map_err(|e| redis_error("EXISTS", e))
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.get_connection().await?;
        redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("FLUSHDB", e))
    }

    async fn size(&self) -> Result<usize> {
        let mut conn = self.get_connection().await?;
        redis::cmd("DBSIZE")
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("DBSIZE", e))
    }

    async fn close(&self) -> Result<()> {
        if self.manager.lock().await.take().is_some() {
            debug!(uri = %self.uri, "redis connection closed");
        }
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisCacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheProvider")
            .field("uri", &self.uri)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

fn redis_cache_factory(
    config: &CacheProviderConfig,
) -> std::result::Result<Arc<dyn CacheProvider>, String> {
    let uri = config.uri.as_deref().unwrap_or(REDIS_DEFAULT_URI);

    let provider =
        RedisCacheProvider::new(uri).map_err(|e| format!("Failed to create Redis provider: {e}"))?;

    Ok(Arc::new(provider))
}

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static REDIS_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "redis",
    description: "Redis distributed cache",
    factory: redis_cache_factory,
};
