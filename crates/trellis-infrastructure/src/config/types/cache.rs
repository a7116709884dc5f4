//! Cache configuration types

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CACHE_CAPACITY;

/// Cache backends known to the configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// In-memory cache (Moka)
    #[default]
    Moka,
    /// Distributed cache (Redis)
    Redis,
}

impl CacheBackend {
    /// Registry name of the provider
    pub fn provider_name(self) -> &'static str {
        match self {
            Self::Moka => "moka",
            Self::Redis => "redis",
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache provider
    pub provider: CacheBackend,
    /// Redis URL (for Redis provider)
    pub redis_url: Option<String>,
    /// Maximum number of entries (for Moka provider)
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: CacheBackend::Moka,
            redis_url: None,
            max_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}
