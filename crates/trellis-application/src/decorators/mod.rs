//! Method decorators
//!
//! Behaviour layered around container-managed methods:
//!
//! - [`cache`] - cache-aside wrappers (`Cacheable`, `CachePut`, `CacheEvict`)
//! - [`cache_key`] - key derivation from policies and call arguments
//! - [`schedule`] - cron-driven job runner

pub mod cache;
pub mod cache_key;
pub mod schedule;

pub use cache::{CacheAside, decorate_invoker};
pub use cache_key::{KEY_SEPARATOR, generate_cache_key, resolve_cache_key, stable_stringify};
pub use schedule::{JobFn, JobScheduler, ScheduledJob};
