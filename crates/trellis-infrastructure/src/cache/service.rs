//! Shared cache service

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;
use trellis_application::decorators::CacheAside;
use trellis_application::ports::registry::{CacheProviderConfig, resolve_cache_provider};
use trellis_domain::error::{Error, Result};
use trellis_domain::ports::{CacheEntryConfig, CacheProvider};
use trellis_domain::value_objects::TimeUnit;

use crate::config::{CacheBackend, CacheConfig};
use crate::di::Named;

/// Resolve the configured cache provider from the registry
pub fn create_cache_provider(config: &CacheConfig) -> Result<Arc<dyn CacheProvider>> {
    let mut provider_config =
        CacheProviderConfig::new(config.provider.provider_name()).with_max_size(config.max_capacity);
    if config.provider == CacheBackend::Redis {
        if let Some(url) = &config.redis_url {
            provider_config = provider_config.with_uri(url.clone());
        }
    }
    let provider = resolve_cache_provider(&provider_config)
        .map_err(|e| Error::configuration(format!("Failed to resolve cache provider: {e}")))?;
    info!(provider = provider.provider_name(), "cache provider resolved");
    Ok(provider)
}

/// Cache store client shared by the whole process
#[derive(Debug, Clone)]
pub struct CacheService {
    provider: Arc<dyn CacheProvider>,
}

impl Named for CacheService {
    const NAME: &'static str = "CacheService";
}

impl CacheService {
    /// Wrap `provider`
    pub fn new(provider: Arc<dyn CacheProvider>) -> Self {
        Self { provider }
    }

    /// Service over the provider selected by `config`
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        create_cache_provider(config).map(Self::new)
    }

    /// Underlying provider
    pub fn provider(&self) -> &Arc<dyn CacheProvider> {
        &self.provider
    }

    /// Cache-aside helper over the same provider
    pub fn aside(&self) -> CacheAside {
        CacheAside::new(Arc::clone(&self.provider))
    }

    /// Typed value at `key`
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.provider.get_json(key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Store `value` at `key` for `ttl` units
    pub async fn set_with_ttl<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: i64,
        unit: TimeUnit,
    ) -> Result<()> {
        let ttl = unit.duration(ttl).ok_or_else(|| {
            Error::cache(format!("Cache key \"{key}\" must have a TTL greater than 0."))
        })?;
        let json = serde_json::to_string(value)?;
        self.provider
            .set_json(key, &json, CacheEntryConfig::default().with_ttl(ttl))
            .await
    }

    /// Remove `key`; `true` if it existed
    pub async fn remove(&self, key: &str) -> Result<bool> {
        self.provider.delete(key).await
    }

    /// Whether `key` is present
    pub async fn has(&self, key: &str) -> Result<bool> {
        self.provider.exists(key).await
    }

    /// Release the provider on shutdown
    pub async fn close(&self) -> Result<()> {
        self.provider.close().await
    }
}
