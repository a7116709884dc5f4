//! Provider constants

// ============================================================================
// Cache
// ============================================================================

/// Default maximum number of entries of the in-memory cache
pub const CACHE_DEFAULT_CAPACITY: u64 = 10_000;

/// Default Redis connection URI
pub const REDIS_DEFAULT_URI: &str = "redis://localhost:6379";
