//! Configuration types module

pub mod app;
pub mod auth;
pub mod cache;
pub mod database;
pub mod jobs;
pub mod logging;
pub mod server;

// Re-export main types
pub use app::{AppConfig, AppOptions};
pub use auth::{AuthConfig, JwtConfig};
pub use cache::{CacheBackend, CacheConfig};
pub use database::DatabaseConfig;
pub use jobs::{JobConfig, JobsConfig};
pub use logging::LoggingConfig;
pub use server::ServerConfig;
