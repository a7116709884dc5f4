//! Login sessions
//!
//! A token is honoured only while its session marker exists in the cache
//! store under `userToken@<userId>`. Logging out removes the marker, which
//! revokes every token issued to the user.

use trellis_application::decorators::generate_cache_key;
use trellis_domain::error::Result;
use trellis_domain::value_objects::TimeUnit;

use crate::cache::CacheService;
use crate::config::AuthConfig;
use crate::constants::{KEY_USER_TOKEN, SESSION_DEFAULT_TTL_DAYS};
use crate::di::Named;

/// Session markers in the cache store
#[derive(Debug, Clone)]
pub struct SessionService {
    cache: CacheService,
    ttl_days: i64,
}

impl Named for SessionService {
    const NAME: &'static str = "SessionService";
}

impl SessionService {
    /// Sessions lasting `ttl_days`
    pub fn new(cache: CacheService, ttl_days: i64) -> Self {
        Self { cache, ttl_days }
    }

    /// Sessions configured by `auth.session_ttl_days`
    pub fn from_config(cache: CacheService, config: &AuthConfig) -> Self {
        Self::new(cache, config.session_ttl_days)
    }

    /// Cache key of the marker for `user_id`
    pub fn session_key(user_id: &str) -> String {
        generate_cache_key(&[KEY_USER_TOKEN, user_id])
    }

    /// Session lifetime in days
    pub fn ttl_days(&self) -> i64 {
        self.ttl_days
    }

    /// Store the marker for `user_id`, holding the issued token
    pub async fn open(&self, user_id: &str, token: &str) -> Result<()> {
        self.cache
            .set_with_ttl(&Self::session_key(user_id), token, self.ttl_days, TimeUnit::Day)
            .await
    }

    /// Remove the marker; `true` if a session was open
    pub async fn close(&self, user_id: &str) -> Result<bool> {
        self.cache.remove(&Self::session_key(user_id)).await
    }

    /// Whether `user_id` has a live session
    pub async fn is_open(&self, user_id: &str) -> Result<bool> {
        self.cache.has(&Self::session_key(user_id)).await
    }
}

impl From<CacheService> for SessionService {
    fn from(cache: CacheService) -> Self {
        Self::new(cache, SESSION_DEFAULT_TTL_DAYS)
    }
}
