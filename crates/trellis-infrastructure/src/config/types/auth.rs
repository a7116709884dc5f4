//! Authentication configuration types

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_PRIVILEGED_ROLE, JWT_DEFAULT_EXPIRATION_DAYS, SESSION_DEFAULT_TTL_DAYS,
};

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// HS256 signing secret
    pub secret: String,
    /// Token lifetime in days
    pub expiration_days: u64,
}

/// Returns default JWT configuration with:
/// - Development secret (override in production)
/// - 30 day expiration
impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "trellis-development-secret".to_string(),
            expiration_days: JWT_DEFAULT_EXPIRATION_DAYS,
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Token signing options
    pub jwt: JwtConfig,
    /// Lifetime of the session marker written at login, in days
    pub session_ttl_days: i64,
    /// Roles whose holders skip permission checks
    pub privileged_roles: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            session_ttl_days: SESSION_DEFAULT_TTL_DAYS,
            privileged_roles: vec![DEFAULT_PRIVILEGED_ROLE.to_string()],
        }
    }
}
