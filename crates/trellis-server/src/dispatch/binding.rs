//! Argument binding
//!
//! Fills a fresh [`ArgSlots`] from the declared parameter bindings and
//! context bindings of a route. Validation failures of every binding are
//! reported together.

use serde_json::Value;
use trellis_domain::error::{Error, Result};
use trellis_domain::value_objects::{ArgSlots, ParamSource, RequestContext};

use crate::routing::BoundRoute;

/// Parse a request body; an empty body is `null`
pub fn parse_body(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| Error::validation(format!("Request body is not valid JSON: {e}")))
}

/// Positional arguments of `route` for the request in `context`
pub fn bind_arguments(route: &BoundRoute, context: &RequestContext) -> Result<ArgSlots> {
    let mut args = ArgSlots::with_arity(route.arity);
    let mut violations = Vec::new();

    for binding in &route.params {
        let section = match binding.source {
            ParamSource::Query => &context.query,
            ParamSource::Path => &context.params,
            ParamSource::Header => &context.headers,
            ParamSource::Body => &context.body,
        };
        let raw = match &binding.key {
            Some(key) => section.get(key).cloned().unwrap_or(Value::Null),
            None => section.clone(),
        };
        match binding.bind(raw) {
            Ok(argument) => args.fill(binding.index, argument)?,
            Err(Error::Validation { message }) => violations.push(message),
            Err(other) => return Err(other),
        }
    }
    if !violations.is_empty() {
        return Err(Error::validation(violations.join("; ")));
    }

    for binding in &route.contexts {
        args.fill(binding.index, context.slice(binding.source))?;
    }
    Ok(args)
}
