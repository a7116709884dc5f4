//! Infrastructure layer constants

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Directory holding configuration files
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Shared configuration file name
pub const SHARED_CONFIG_FILENAME: &str = "trellis.toml";

/// Environment variable selecting the environment-specific file
pub const CONFIG_ENV_VAR: &str = "TRELLIS_ENV";

/// Environment used when `TRELLIS_ENV` is unset
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "TRELLIS";

/// Separator between nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// SERVER CONSTANTS
// ============================================================================

/// Default bind address
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default HTTP port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

// ============================================================================
// AUTHENTICATION CONSTANTS
// ============================================================================

/// JWT default expiration in days
pub const JWT_DEFAULT_EXPIRATION_DAYS: u64 = 30;

/// Session marker default lifetime in days
pub const SESSION_DEFAULT_TTL_DAYS: i64 = 30;

/// Role that bypasses permission checks by default
pub const DEFAULT_PRIVILEGED_ROLE: &str = "ADMIN";

/// Authorization header name
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Bearer token prefix
pub const BEARER_PREFIX: &str = "Bearer ";

/// Cache scope of session markers
pub const KEY_USER_TOKEN: &str = "userToken";

/// PBKDF2 iteration count
pub const PBKDF2_ITERATIONS: u32 = 1_000;

/// PBKDF2 derived key length in bytes
pub const PBKDF2_KEY_LENGTH: usize = 16;

/// Random salt length in bytes
pub const PASSWORD_SALT_LENGTH: usize = 16;

// ============================================================================
// CACHE CONSTANTS
// ============================================================================

/// Default cache provider
pub const DEFAULT_CACHE_PROVIDER: &str = "moka";

/// Default in-memory cache capacity
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

// ============================================================================
// DATABASE CONSTANTS
// ============================================================================

/// Default maximum number of pooled database connections
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "TRELLIS_LOG";
