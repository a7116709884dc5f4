//! # Infrastructure Layer
//!
//! Runtime plumbing for Trellis:
//!
//! - [`di`] - component declarations, discovery and the singleton container
//! - [`config`] - layered configuration with figment
//! - [`logging`] - tracing subscriber setup
//! - [`crypto`] - JWT and password hashing
//! - [`cache`] - cache provider resolution and the shared cache service
//! - [`session`] - login session markers
//! - [`error_ext`] - context helpers for foreign errors

pub mod cache;
pub mod config;
pub mod constants;
pub mod crypto;
pub mod di;
pub mod error_ext;
pub mod logging;
pub mod session;

pub use cache::CacheService;
pub use config::{AppConfig, ConfigBuilder, ConfigLoader};
pub use di::{ComponentRegistry, Container, Declaration, Inject, Injectable, Named};
pub use session::SessionService;
