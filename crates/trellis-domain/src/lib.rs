//! # Trellis Domain Layer
//!
//! Core types shared by every layer of the runtime: the error taxonomy,
//! immutable value objects describing routes, bindings and cache policies,
//! and the port traits implemented by providers.
//!
//! ## Architecture
//!
//! ```text
//! trellis-domain        (this crate: errors, value objects, ports)
//!     ^
//! trellis-application   (metadata registry, decorators, job runner)
//!     ^
//! trellis-infrastructure (container, config, logging, crypto)
//!     ^
//! trellis-server        (route table, dispatch pipeline, transport)
//! ```
//!
//! The domain layer has no knowledge of HTTP transports, cache backends or
//! configuration formats.

/// Error taxonomy with HTTP status mapping
pub mod error;
/// Port traits implemented by providers and applications
pub mod ports;
/// Immutable value objects
pub mod value_objects;

pub use error::{Error, Result};
