//! Configuration management
//!
//! Layered loading with figment and the typed configuration tree.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::*;
