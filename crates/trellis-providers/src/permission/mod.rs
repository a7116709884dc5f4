//! Permission provider implementations

#[cfg(feature = "permission-memory")]
pub mod memory;

#[cfg(feature = "permission-memory")]
pub use memory::InMemoryPermissionProvider;
