//! Domain Port Interfaces
//!
//! Boundary contracts implemented by providers and applications.
//!
//! ## Organization
//!
//! - **cache** - key/value backend used by sessions and cache decorators
//! - **permission** - role and permission lookups for route authorization
//! - **middleware** - per-route hooks run ahead of the dispatch pipeline

/// Cache backend port
pub mod cache;
/// Route middleware port
pub mod middleware;
/// Role and permission lookup port
pub mod permission;

pub use cache::{CacheEntryConfig, CacheProvider};
pub use middleware::Middleware;
pub use permission::PermissionProvider;
