//! Error boundary
//!
//! The last stop of a failed request. Classified errors keep their status
//! and message; anything else becomes a `500` with a generic message and
//! is logged in full.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};
use trellis_domain::error::Error;

/// Client-visible body of a failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Correlation id of the failing request
    pub request_id: String,
    /// Public message
    pub message: String,
    /// Stable error code
    pub code: String,
}

/// Outcome of a dispatched request
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResponse {
    /// HTTP status
    pub status: u16,
    /// JSON body
    pub body: Value,
    /// Correlation id
    pub request_id: String,
}

impl DispatchResponse {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as an error envelope, if it is one
    pub fn envelope(&self) -> Option<ErrorEnvelope> {
        serde_json::from_value(self.body.clone()).ok()
    }
}

/// Render `error` for the request `request_id`
///
/// The error is tagged with `request_id` unless already tagged.
pub fn render_error(error: Error, request_id: &str) -> DispatchResponse {
    let error = error.tag(request_id);
    let request_id = error.request_id().unwrap_or(request_id).to_string();
    if error.is_classified() {
        warn!(request_id = %request_id, code = error.code(), error = %error, "request failed");
    } else {
        error!(request_id = %request_id, error = ?error, "unhandled error");
    }

    let envelope = ErrorEnvelope {
        request_id: request_id.clone(),
        message: error.public_message(),
        code: error.code().to_string(),
    };
    DispatchResponse {
        status: error.status(),
        body: serde_json::to_value(&envelope).unwrap_or(Value::Null),
        request_id,
    }
}
