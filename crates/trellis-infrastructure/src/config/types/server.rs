//! HTTP server configuration

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Origins allowed by CORS; `*` allows any
    pub cors_allowed_origins: Vec<String>,
}

/// Returns default server configuration with:
/// - Host 127.0.0.1, port 3000
/// - CORS open to any origin
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}
