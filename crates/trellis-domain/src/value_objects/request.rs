//! Request-scoped values

use serde::Serialize;
use serde_json::{Map, Value};

use super::arguments::Argument;
use super::binding::ContextSource;
use super::route::HttpMethod;

/// Transport-independent view of an inbound request
#[derive(Debug, Clone)]
pub struct InboundRequest {
    /// HTTP verb
    pub method: HttpMethod,
    /// Request path without query string
    pub path: String,
    /// Remote host or address, for logging
    pub host: String,
    /// Decoded query string; repeated keys become arrays
    pub query: Map<String, Value>,
    /// Headers with lower-cased names
    pub headers: Map<String, Value>,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl InboundRequest {
    /// Empty request for `method` and `path`
    pub fn new<S: Into<String>>(method: HttpMethod, path: S) -> Self {
        Self {
            method,
            path: path.into(),
            host: String::from("-"),
            query: Map::new(),
            headers: Map::new(),
            body: Vec::new(),
        }
    }

    /// Add a query pair; repeated names accumulate into an array
    #[must_use]
    pub fn with_query<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.push_query(name.into(), value.into());
        self
    }

    /// Add a header, name lower-cased
    #[must_use]
    pub fn with_header<K: AsRef<str>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.insert(
            name.as_ref().to_ascii_lowercase(),
            Value::String(value.into()),
        );
        self
    }

    /// Set a JSON body
    #[must_use]
    pub fn with_json(mut self, body: &Value) -> Self {
        self.body = body.to_string().into_bytes();
        self
    }

    /// Set the remote host
    #[must_use]
    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }

    /// Add a decoded query pair
    pub fn push_query(&mut self, name: String, value: String) {
        match self.query.get_mut(&name) {
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                self.query.insert(name, Value::String(value));
            }
        }
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(Value::as_str)
    }
}

/// Request context injectable into handler arguments
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// Correlation id
    pub request_id: String,
    /// Authenticated user, if any
    pub user_id: Option<String>,
    /// HTTP verb
    pub method: HttpMethod,
    /// Request path
    pub path: String,
    /// Remote host
    pub host: String,
    /// Query section
    pub query: Value,
    /// Path parameters
    pub params: Value,
    /// Headers
    pub headers: Value,
    /// Parsed body
    pub body: Value,
}

impl RequestContext {
    /// Argument carrying the requested slice of the context
    pub fn slice(&self, source: Option<ContextSource>) -> Argument {
        match source {
            None | Some(ContextSource::Request) => Argument::new(
                serde_json::to_value(self).unwrap_or(Value::Null),
                self.clone(),
            ),
            Some(ContextSource::RequestId) => Argument::new(
                Value::String(self.request_id.clone()),
                self.request_id.clone(),
            ),
            Some(ContextSource::UserId) => Argument::new(
                self.user_id.clone().map_or(Value::Null, Value::String),
                self.user_id.clone(),
            ),
            Some(ContextSource::Query) => value_argument(&self.query),
            Some(ContextSource::Params) => value_argument(&self.params),
            Some(ContextSource::Headers) => value_argument(&self.headers),
            Some(ContextSource::Body) => value_argument(&self.body),
        }
    }
}

fn value_argument(value: &Value) -> Argument {
    Argument::new(value.clone(), value.clone())
}
