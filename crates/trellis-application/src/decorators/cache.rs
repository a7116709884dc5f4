//! Cache-aside decorators
//!
//! [`CacheAside`] wraps a call with one of three behaviours:
//!
//! | Operation | Behaviour |
//! |-----------|-----------|
//! | `Cacheable` | return the cached value if present, otherwise invoke and store non-null results |
//! | `Put` | always invoke, then refresh the entry with non-null results |
//! | `Evict` | invoke, then remove the entry |
//!
//! Storing requires a positive TTL; a policy without one fails with
//! [`Error::Cache`] when the first value would be written.
//!
//! Route handlers get the same behaviour transparently through
//! [`decorate_invoker`].

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use trellis_domain::error::{Error, Result};
use trellis_domain::ports::{CacheEntryConfig, CacheProvider};
use trellis_domain::value_objects::{
    ArgSlots, CacheDirective, CacheOperation, CachePolicy, Instance, Invoker, MethodFuture,
    MethodSignature,
};

use super::cache_key::resolve_cache_key;

/// Cache-aside helper bound to a cache provider
#[derive(Debug, Clone)]
pub struct CacheAside {
    provider: Arc<dyn CacheProvider>,
}

impl CacheAside {
    /// Create a helper over `provider`
    pub fn new(provider: Arc<dyn CacheProvider>) -> Self {
        Self { provider }
    }

    /// The underlying provider
    pub fn provider(&self) -> &Arc<dyn CacheProvider> {
        &self.provider
    }

    /// Return the cached value for `key` or compute and store it
    pub async fn cacheable<T, F, Fut>(&self, policy: &CachePolicy, key: &str, call: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(json) = self.provider.get_json(key).await? {
            debug!(key, "cache hit");
            return Ok(serde_json::from_str(&json)?);
        }
        debug!(key, "cache miss");
        let value = call().await?;
        self.store(policy, key, &value).await?;
        Ok(value)
    }

    /// Compute the value and refresh the entry for `key`
    pub async fn put<T, F, Fut>(&self, policy: &CachePolicy, key: &str, call: F) -> Result<T>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let value = call().await?;
        self.store(policy, key, &value).await?;
        Ok(value)
    }

    /// Run the call and remove the entry for `key`
    pub async fn evict<T, F, Fut>(&self, key: &str, call: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let value = call().await?;
        if self.provider.delete(key).await? {
            debug!(key, "cache entry evicted");
        }
        Ok(value)
    }

    async fn store<T: Serialize>(&self, policy: &CachePolicy, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_value(value)?;
        if json.is_null() {
            return Ok(());
        }
        let ttl = policy.time_to_live().ok_or_else(|| {
            Error::cache(format!("Cache key \"{key}\" must have a TTL greater than 0."))
        })?;
        self.provider
            .set_json(key, &json.to_string(), CacheEntryConfig::default().with_ttl(ttl))
            .await
    }
}

/// Wrap a method invoker with a cache directive
///
/// The key is derived per call from the raw bound arguments.
pub fn decorate_invoker(
    invoker: Invoker,
    directive: CacheDirective,
    signature: Option<MethodSignature>,
    cache: CacheAside,
) -> Invoker {
    let directive = Arc::new(directive);
    let signature = Arc::new(signature);
    Arc::new(move |instance: Instance, args: ArgSlots| -> MethodFuture {
        let key = resolve_cache_key(
            &directive.policy,
            Option::as_ref(&signature),
            &args.raw_values(),
        );
        let invoker = Arc::clone(&invoker);
        let directive = Arc::clone(&directive);
        let cache = cache.clone();
        Box::pin(async move {
            let call = || invoker(instance, args);
            match directive.operation {
                CacheOperation::Cacheable => cache.cacheable(&directive.policy, &key, call).await,
                CacheOperation::Put => cache.put(&directive.policy, &key, call).await,
                CacheOperation::Evict => cache.evict(&key, call).await,
            }
        })
    })
}
