//! Database connection configuration

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DATABASE_MAX_CONNECTIONS;

/// Database connection parameters
///
/// Handed to application components through the container; the runtime
/// itself opens no connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL
    pub url: Option<String>,
    /// Maximum pooled connections
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
        }
    }
}
