//! Parameter and context bindings
//!
//! A [`ParamBinding`] states that handler argument `index` is read from a
//! request section (query, path, header or body), optionally narrowed to a
//! single key, coerced and validated into the argument's declared type.
//!
//! Binding runs in three steps:
//!
//! 1. **Coercion** - string values declared as numbers or booleans are
//!    converted ([`ScalarKind`]), either on the value itself or on declared
//!    object fields ([`FieldCoercion`])
//! 2. **Decoding** - the coerced JSON is deserialized into the target type
//! 3. **Validation** - [`BindTarget::check`] runs the type's constraints
//!
//! Failures of every step surface as [`Error::Validation`] with all messages
//! of that step joined by `"; "`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Number, Value};

use super::arguments::Argument;
use crate::error::{Error, Result};

/// Request section a parameter is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSource {
    /// Decoded query string
    Query,
    /// Named path segments
    Path,
    /// Request headers, keys lower-cased
    Header,
    /// Parsed JSON body
    Body,
}

impl ParamSource {
    /// Lower-case name used in messages
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Path => "params",
            Self::Header => "headers",
            Self::Body => "body",
        }
    }
}

/// Slice of the request context injected into a handler argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextSource {
    /// The whole [`RequestContext`](super::RequestContext)
    Request,
    /// Correlation id as `String`
    RequestId,
    /// Authenticated user id as `Option<String>`
    UserId,
    /// Query section as `serde_json::Value`
    Query,
    /// Path parameters as `serde_json::Value`
    Params,
    /// Headers as `serde_json::Value`
    Headers,
    /// Body as `serde_json::Value`
    Body,
}

/// Scalar conversion applied to string input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Integer or floating point number
    Number,
    /// `true` or `false`
    Boolean,
    /// Declared conversion the runtime does not know
    Unsupported(&'static str),
}

/// Coercion declared on a named field of an object target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCoercion {
    /// Field name as it appears in the request
    pub field: &'static str,
    /// Conversion applied to the field's string value
    pub kind: ScalarKind,
}

impl FieldCoercion {
    /// Declare a numeric field
    pub const fn number(field: &'static str) -> Self {
        Self {
            field,
            kind: ScalarKind::Number,
        }
    }

    /// Declare a boolean field
    pub const fn boolean(field: &'static str) -> Self {
        Self {
            field,
            kind: ScalarKind::Boolean,
        }
    }
}

/// A type a handler argument can be bound to
///
/// DTOs implement [`check`](BindTarget::check) with `validator`:
///
/// ```ignore
/// impl BindTarget for GetUsersDto {
///     const COERCIONS: &'static [FieldCoercion] =
///         &[FieldCoercion::number("age"), FieldCoercion::boolean("gender")];
///
///     fn check(&self) -> Result<(), Vec<String>> {
///         self.validate().map_err(|e| validation_messages(&e))
///     }
/// }
/// ```
pub trait BindTarget: DeserializeOwned + Send + 'static {
    /// Coercion applied when the bound value itself is a string
    fn scalar() -> Option<ScalarKind> {
        None
    }

    /// Coercions applied to string fields when the bound value is an object
    const COERCIONS: &'static [FieldCoercion] = &[];

    /// Validate the decoded value
    fn check(&self) -> std::result::Result<(), Vec<String>> {
        Ok(())
    }
}

macro_rules! scalar_targets {
    ($kind:ident => $($ty:ty),+) => {
        $(impl BindTarget for $ty {
            fn scalar() -> Option<ScalarKind> {
                Some(ScalarKind::$kind)
            }
        })+
    };
}

scalar_targets!(Number => i32, i64, u32, u64, usize, f64);
scalar_targets!(Boolean => bool);

impl BindTarget for String {}
impl BindTarget for Value {}
impl BindTarget for Vec<String> {}
impl BindTarget for HashMap<String, String> {}

impl<T: BindTarget> BindTarget for Option<T> {
    fn scalar() -> Option<ScalarKind> {
        T::scalar()
    }

    const COERCIONS: &'static [FieldCoercion] = T::COERCIONS;

    fn check(&self) -> std::result::Result<(), Vec<String>> {
        self.as_ref().map_or(Ok(()), BindTarget::check)
    }
}

/// Decodes a raw request value into a handler argument
pub type Binder = Arc<dyn Fn(Value) -> Result<Argument> + Send + Sync>;

/// Declares where a handler argument comes from
#[derive(Clone)]
pub struct ParamBinding {
    /// Request section
    pub source: ParamSource,
    /// Key inside the section; `None` binds the whole section
    pub key: Option<String>,
    /// Positional argument index
    pub index: usize,
    /// Name of the declared argument type
    pub target: &'static str,
    /// Decoder for the declared type
    pub binder: Binder,
}

impl ParamBinding {
    /// Declare a binding decoded into `T`
    pub fn new<T: BindTarget>(source: ParamSource, index: usize, key: Option<&str>) -> Self {
        let label = key.map_or_else(|| source.as_str().to_string(), str::to_string);
        let binder: Binder = Arc::new(move |raw| {
            let (coerced, value) = bind_value::<T>(raw, &label)?;
            Ok(Argument::new(coerced, value))
        });
        Self {
            source,
            key: key.map(str::to_string),
            index,
            target: std::any::type_name::<T>(),
            binder,
        }
    }

    /// Decode a raw value with this binding's declared type
    pub fn bind(&self, raw: Value) -> Result<Argument> {
        (self.binder)(raw)
    }
}

impl fmt::Debug for ParamBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamBinding")
            .field("source", &self.source)
            .field("key", &self.key)
            .field("index", &self.index)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Declares that a handler argument receives a request context slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextBinding {
    /// Positional argument index
    pub index: usize,
    /// Context slice; `None` injects the whole context
    pub source: Option<ContextSource>,
}

/// Coerce, decode and validate a raw value as `T`
///
/// Returns the coerced JSON alongside the decoded value.
pub fn bind_value<T: BindTarget>(raw: Value, label: &str) -> Result<(Value, T)> {
    let mut errors = Vec::new();
    let coerced = match (raw, T::scalar()) {
        (Value::String(text), Some(kind)) => match coerce_scalar(label, kind, &text) {
            Ok(value) => value,
            Err(message) => {
                errors.push(message);
                Value::String(text)
            }
        },
        (Value::Object(mut fields), _) => {
            for coercion in T::COERCIONS {
                let outcome = match fields.get(coercion.field) {
                    Some(Value::String(text)) => coerce_scalar(coercion.field, coercion.kind, text),
                    _ => continue,
                };
                match outcome {
                    Ok(value) => {
                        fields.insert(coercion.field.to_string(), value);
                    }
                    Err(message) => errors.push(message),
                }
            }
            Value::Object(fields)
        }
        (other, _) => other,
    };
    if !errors.is_empty() {
        return Err(Error::validation(errors.join("; ")));
    }

    let value: T = serde_json::from_value(coerced.clone())
        .map_err(|e| Error::validation(format!("\"{label}\" is invalid: {e}")))?;
    value
        .check()
        .map_err(|messages| Error::validation(messages.join("; ")))?;
    Ok((coerced, value))
}

fn coerce_scalar(field: &str, kind: ScalarKind, text: &str) -> std::result::Result<Value, String> {
    match kind {
        ScalarKind::Number => {
            let trimmed = text.trim();
            if let Ok(integer) = trimmed.parse::<i64>() {
                return Ok(Value::from(integer));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("\"{field}\" must be a number"))
        }
        ScalarKind::Boolean => match text.trim() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(format!("\"{field}\" must be a boolean")),
        },
        ScalarKind::Unsupported(name) => {
            Err(format!("Unsupported parse type \"{name}\" for \"{field}\""))
        }
    }
}

/// Flatten `validator` field errors into sorted messages
pub fn validation_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| {
                error.message.as_ref().map_or_else(
                    || format!("\"{field}\" failed the \"{}\" constraint", error.code),
                    ToString::to_string,
                )
            })
        })
        .collect();
    messages.sort();
    messages
}
