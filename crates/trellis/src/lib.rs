//! # Trellis
//!
//! Declarative service framework: components declare their dependencies and
//! the facts of their methods, and the runtime turns them into a singleton
//! graph, an HTTP route table, cache-aside decorators and scheduled jobs.
//!
//! ## Features
//!
//! - **Dependency injection**: singletons with constructor and property
//!   injection, including circular references through lazy resolvers
//! - **HTTP dispatch**: authentication, permission checks, parameter binding
//!   and validation, uniform error envelopes
//! - **Cache-aside**: cacheable, put and evict decorators keyed by argument
//! - **Scheduled jobs**: six-field cron schedules enabled per scope
//!
//! ## Example
//!
//! ```rust,no_run
//! use trellis::accounts;
//!
//! #[tokio::main]
//! async fn main() -> trellis::Result<()> {
//!     accounts::application().build()?.run().await
//! }
//! ```
//!
//! ## Architecture
//!
//! - `domain` - error taxonomy, value objects, ports
//! - `application` - metadata registry, cache decorators, job scheduler
//! - `infrastructure` - container, configuration, logging, crypto, cache
//! - `server` - route table, dispatch pipeline, HTTP transport
//! - [`accounts`] - account management built on the above

/// Domain layer - errors, value objects and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use trellis_domain::*;
}

/// Application layer - metadata, decorators and scheduling
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use trellis_application::*;
}

/// Infrastructure layer - DI, config, and infrastructure services
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use trellis_infrastructure::*;
}

/// Server layer - routing, dispatch and transport
///
/// Re-exports from the server crate for convenience
pub mod server {
    pub use trellis_server::*;
}

pub mod accounts;

// Re-export commonly used types at the crate root
pub use domain::{Error, Result};
pub use infrastructure::{ComponentRegistry, Container, Declaration, Inject, Injectable, Named};
pub use server::{Application, ApplicationBuilder};
