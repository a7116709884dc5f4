//! Cache wiring
//!
//! Resolves the configured provider from the registry and wraps it in the
//! [`CacheService`] singleton shared by sessions, cache decorators and
//! application components.

mod service;

pub use service::{CacheService, create_cache_provider};
