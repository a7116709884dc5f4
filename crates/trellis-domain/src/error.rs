//! Error handling types
//!
//! Every failure in the runtime is an [`Error`]. Errors raised while a request
//! is dispatched are classified: each classified variant maps to an HTTP
//! status and is rendered to the client with its message. Anything else is
//! unclassified and rendered as a generic `500 Internal Server Error`.
//!
//! | Variant | Status | Raised by |
//! |---------|--------|-----------|
//! | `ObjectInitialization` | 500 | container construction (fatal) |
//! | `RouteInitialization` | 500 | route table builder (fatal) |
//! | `Authorization` | 401 | missing, invalid or expired credential |
//! | `Authentication` | 403 | permission denied |
//! | `Validation` | 400 | parameter binding |
//! | `Cache` | 500 | misconfigured cache policy |
//! | `Service` | custom | business rules in handlers |
//! | `NotFound` | 404 | no matching route or resource |

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Generic message rendered for unclassified failures
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

/// Default status of a business error raised without an explicit status
pub const DEFAULT_SERVICE_ERROR_STATUS: u16 = 400;

/// Main error type for Trellis
#[derive(Error, Debug)]
pub enum Error {
    /// Object graph could not be constructed
    #[error("Object initialization error: {message}")]
    ObjectInitialization {
        /// Description of the construction failure
        message: String,
    },

    /// Route metadata is inconsistent
    #[error("Route initialization error: {message}")]
    RouteInitialization {
        /// Description of the route failure
        message: String,
    },

    /// Credential missing, unparseable, expired, or no live session
    #[error("Authorization error: {message}")]
    Authorization {
        /// Description of the authorization failure
        message: String,
    },

    /// Authenticated caller lacks a declared permission
    #[error("Authentication error: {message}")]
    Authentication {
        /// Description of the authentication failure
        message: String,
    },

    /// Parameter binding or validation failed
    #[error("Validation error: {message}")]
    Validation {
        /// Aggregated validation messages
        message: String,
    },

    /// Cache policy is misconfigured
    #[error("Cache error: {message}")]
    Cache {
        /// Description of the cache failure
        message: String,
    },

    /// Business error raised by handler code
    #[error("Service error: {message}")]
    Service {
        /// Message rendered to the client
        message: String,
        /// HTTP status code
        status: u16,
    },

    /// Resource or route not found
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Infrastructure operation error (cache backend, database, transport)
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O operation error
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },

    /// Error correlated with the request that produced it
    #[error("{error}")]
    Tagged {
        /// Correlation id of the failing request
        request_id: String,
        /// The underlying error
        #[source]
        error: Box<Error>,
    },
}

// Initialization error creation methods
impl Error {
    /// Create an object initialization error
    pub fn object_initialization<S: Into<String>>(message: S) -> Self {
        Self::ObjectInitialization {
            message: message.into(),
        }
    }

    /// Create a route initialization error
    pub fn route_initialization<S: Into<String>>(message: S) -> Self {
        Self::RouteInitialization {
            message: message.into(),
        }
    }
}

// Request error creation methods
impl Error {
    /// Create an authorization error (401)
    pub fn authorization<S: Into<String>>(message: S) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    /// Create an authentication error (403)
    pub fn authentication<S: Into<String>>(message: S) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a business error with the default status
    pub fn service<S: Into<String>>(message: S) -> Self {
        Self::service_with_status(message, DEFAULT_SERVICE_ERROR_STATUS)
    }

    /// Create a business error with an explicit status
    pub fn service_with_status<S: Into<String>>(message: S, status: u16) -> Self {
        Self::Service {
            message: message.into(),
            status,
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }
}

// Configuration and infrastructure error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }

    /// Create an infrastructure error with source
    pub fn infrastructure_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Classification at the request boundary
impl Error {
    /// Attach a request correlation id unless one is already attached
    #[must_use]
    pub fn tag<S: Into<String>>(self, request_id: S) -> Self {
        match self {
            tagged @ Self::Tagged { .. } => tagged,
            error => Self::Tagged {
                request_id: request_id.into(),
                error: Box::new(error),
            },
        }
    }

    /// Correlation id, if the error has been tagged
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Tagged { request_id, .. } => Some(request_id),
            _ => None,
        }
    }

    /// The error with any correlation tag removed
    pub fn untagged(&self) -> &Self {
        match self {
            Self::Tagged { error, .. } => error.untagged(),
            error => error,
        }
    }

    /// Whether the error belongs to the client-visible taxonomy
    pub fn is_classified(&self) -> bool {
        matches!(
            self.untagged(),
            Self::ObjectInitialization { .. }
                | Self::RouteInitialization { .. }
                | Self::Authorization { .. }
                | Self::Authentication { .. }
                | Self::Validation { .. }
                | Self::Cache { .. }
                | Self::Service { .. }
                | Self::NotFound { .. }
        )
    }

    /// HTTP status code for the error
    pub fn status(&self) -> u16 {
        match self.untagged() {
            Self::Authorization { .. } => 401,
            Self::Authentication { .. } => 403,
            Self::Validation { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::Service { status, .. } => *status,
            _ => 500,
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self.untagged() {
            Self::ObjectInitialization { .. } => "OBJECT_INITIALIZATION_ERROR",
            Self::RouteInitialization { .. } => "ROUTE_INITIALIZATION_ERROR",
            Self::Authorization { .. } => "AUTHORIZATION_ERROR",
            Self::Authentication { .. } => "AUTHENTICATION_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Cache { .. } => "CACHE_ERROR",
            Self::Service { .. } => "SERVICE_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            _ => "INTERNAL_ERROR",
        }
    }

    /// Message rendered to the client
    ///
    /// Classified errors expose their own message; everything else is
    /// reduced to [`INTERNAL_SERVER_ERROR_MESSAGE`].
    pub fn public_message(&self) -> String {
        match self.untagged() {
            Self::ObjectInitialization { message }
            | Self::RouteInitialization { message }
            | Self::Authorization { message }
            | Self::Authentication { message }
            | Self::Validation { message }
            | Self::Cache { message }
            | Self::Service { message, .. } => message.clone(),
            Self::NotFound { resource } => format!("Not found: {resource}"),
            _ => INTERNAL_SERVER_ERROR_MESSAGE.to_string(),
        }
    }
}
