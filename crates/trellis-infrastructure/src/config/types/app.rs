//! Main application configuration

use serde::{Deserialize, Serialize};

use super::{AuthConfig, CacheConfig, DatabaseConfig, JobsConfig, LoggingConfig, ServerConfig};

/// Application-level switches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    /// Print the route table after it is built
    pub print_routes: bool,
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application switches
    pub app: AppOptions,
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Database connection parameters
    pub database: DatabaseConfig,
    /// Cache store configuration
    pub cache: CacheConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Scheduled job switches, keyed by scope
    pub jobs: JobsConfig,
}

impl crate::di::Named for AppConfig {
    const NAME: &'static str = "AppConfig";
}
