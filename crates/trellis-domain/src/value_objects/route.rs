//! Route declarations

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::ports::Middleware;

/// HTTP verb of a handler method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

impl HttpMethod {
    /// Upper-case verb
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            other => Err(Error::not_found(format!("HTTP method {other}"))),
        }
    }
}

/// Verb, path and middlewares of a handler method
#[derive(Debug, Clone)]
pub struct RouteMetadata {
    /// HTTP verb
    pub method: HttpMethod,
    /// Path relative to the controller prefix, `:name` marks a parameter
    pub path: String,
    /// Middlewares run before the pipeline, in order
    pub middlewares: Vec<Arc<dyn Middleware>>,
}

impl RouteMetadata {
    /// Route without middlewares
    pub fn new<S: Into<String>>(method: HttpMethod, path: S) -> Self {
        Self {
            method,
            path: path.into(),
            middlewares: Vec::new(),
        }
    }
}

/// Route prefix shared by every handler of a controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteClassMetadata {
    /// Path prefix, e.g. `/users`
    pub prefix: String,
}
