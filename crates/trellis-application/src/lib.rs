//! # Application Layer
//!
//! Orchestration logic that sits between the domain types and the runtime
//! infrastructure:
//!
//! - [`metadata`] - append-only registry of facts declared on components
//! - [`ports::registry`] - linkme registries cache providers
//!   submit themselves to
//! - [`decorators`] - cache-aside wrappers and the scheduled job runner
//!
//! ## Provider registration
//!
//! ```ignore
//! use trellis_application::ports::registry::{CacheProviderEntry, CACHE_PROVIDERS};
//!
//! #[linkme::distributed_slice(CACHE_PROVIDERS)]
//! static MOKA_PROVIDER: CacheProviderEntry = CacheProviderEntry {
//!     name: "moka",
//!     description: "In-memory cache",
//!     factory: |config| Ok(Arc::new(MokaCacheProvider::with_capacity(config.max_size))),
//! };
//! ```

pub mod decorators;
pub mod metadata;
pub mod ports;

pub use decorators::{CacheAside, JobScheduler, ScheduledJob, generate_cache_key};
pub use metadata::MetadataRegistry;
