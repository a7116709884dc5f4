//! Cache-aside policies
//!
//! A [`CachePolicy`] names a cache scope, an optional key template and a TTL.
//! Key templates starting with `:` refer to a declared method parameter by
//! name, e.g. `":userId"`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Unit a TTL is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// One second
    #[default]
    Second,
    /// Sixty seconds
    Minute,
    /// Sixty minutes
    Hour,
    /// Twenty-four hours
    Day,
    /// Seven days
    Week,
    /// Thirty days
    Month,
}

impl TimeUnit {
    /// Length of one unit in seconds
    pub const fn seconds(self) -> u64 {
        match self {
            Self::Second => 1,
            Self::Minute => 60,
            Self::Hour => 60 * 60,
            Self::Day => 24 * 60 * 60,
            Self::Week => 7 * 24 * 60 * 60,
            Self::Month => 30 * 24 * 60 * 60,
        }
    }

    /// Duration of `amount` units; `None` when `amount` is not positive
    pub fn duration(self, amount: i64) -> Option<Duration> {
        u64::try_from(amount)
            .ok()
            .filter(|amount| *amount > 0)
            .map(|amount| Duration::from_secs(amount.saturating_mul(self.seconds())))
    }
}

/// Scope, key template and TTL of a cache decorator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePolicy {
    /// Key namespace
    pub scope: String,
    /// Literal key or `:param` template; `None` hashes all arguments
    pub key: Option<String>,
    /// Time to live, in `time_unit`; non-positive values are rejected on store
    pub ttl: i64,
    /// Unit of `ttl`
    pub time_unit: TimeUnit,
}

impl CachePolicy {
    /// Policy for `scope` without key or TTL
    pub fn new<S: Into<String>>(scope: S) -> Self {
        Self {
            scope: scope.into(),
            key: None,
            ttl: 0,
            time_unit: TimeUnit::Second,
        }
    }

    /// Set the key template
    #[must_use]
    pub fn key<S: Into<String>>(mut self, key: S) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the TTL in seconds
    #[must_use]
    pub fn ttl(mut self, ttl: i64) -> Self {
        self.ttl = ttl;
        self.time_unit = TimeUnit::Second;
        self
    }

    /// Set the TTL in the given unit
    #[must_use]
    pub fn ttl_in(mut self, ttl: i64, unit: TimeUnit) -> Self {
        self.ttl = ttl;
        self.time_unit = unit;
        self
    }

    /// Effective TTL, `None` when misconfigured
    pub fn time_to_live(&self) -> Option<Duration> {
        self.time_unit.duration(self.ttl)
    }
}

/// Cache-aside behaviour wrapped around a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheOperation {
    /// Return the cached value or invoke and store
    Cacheable,
    /// Invoke and refresh the entry
    Put,
    /// Invoke and remove the entry
    Evict,
}

/// A cache decorator declared on a method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDirective {
    /// Wrapping behaviour
    pub operation: CacheOperation,
    /// Policy of the entry
    pub policy: CachePolicy,
}
