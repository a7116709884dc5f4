//! Server-specific constants

// ============================================================================
// REQUESTS
// ============================================================================

/// Length of a request correlation id
pub const REQUEST_ID_LENGTH: usize = 7;

/// Characters a correlation id is drawn from
pub const REQUEST_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Status of a successful response without a declared override
pub const DEFAULT_SUCCESS_STATUS: u16 = 200;

/// Request body limit when Rocket's `json` limit is not configured, in bytes
pub const DEFAULT_BODY_LIMIT_BYTES: u64 = 1024 * 1024;

// ============================================================================
// CORS
// ============================================================================

/// Wildcard origin
pub const CORS_ANY_ORIGIN: &str = "*";

/// Methods advertised to browsers
pub const CORS_ALLOWED_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";

/// Headers advertised to browsers
pub const CORS_ALLOWED_HEADERS: &str = "authorization, content-type";

/// Response header carrying the correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";
