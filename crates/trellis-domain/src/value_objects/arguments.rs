//! Positional handler arguments
//!
//! A handler method declares an arity. Every dispatch allocates a fresh
//! [`ArgSlots`] of that arity, fills it from parameter and context bindings,
//! and hands it to the method's [`Invoker`]. Slots are never shared between
//! concurrent requests.

use std::any::{Any, type_name};
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::error::{Error, Result};

/// A constructed singleton, type-erased
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Future returned by a method invocation
pub type MethodFuture = BoxFuture<'static, Result<Value>>;

/// Invokes a named method on a singleton with positional arguments
pub type Invoker = Arc<dyn Fn(Instance, ArgSlots) -> MethodFuture + Send + Sync>;

/// Invokes a zero-argument job method on a singleton
pub type JobInvoker = Arc<dyn Fn(Instance) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// A bound handler argument
///
/// Keeps the decoded value for the handler and the raw JSON it was decoded
/// from, which cache decorators use to derive keys.
pub struct Argument {
    raw: Value,
    value: Box<dyn Any + Send>,
}

impl Argument {
    /// Create an argument from its raw and decoded forms
    pub fn new<T: Send + 'static>(raw: Value, value: T) -> Self {
        Self {
            raw,
            value: Box::new(value),
        }
    }

    /// Raw JSON form of the argument
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl std::fmt::Debug for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argument").field("raw", &self.raw).finish_non_exhaustive()
    }
}

/// Positional argument array of a single method invocation
#[derive(Debug, Default)]
pub struct ArgSlots {
    slots: Vec<Option<Argument>>,
}

impl ArgSlots {
    /// Allocate empty slots for a method of the given arity
    pub fn with_arity(arity: usize) -> Self {
        let mut slots = Vec::with_capacity(arity);
        slots.resize_with(arity, || None);
        Self { slots }
    }

    /// Number of slots
    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    /// Fill the slot at `index`
    pub fn fill(&mut self, index: usize, argument: Argument) -> Result<()> {
        let arity = self.slots.len();
        let slot = self.slots.get_mut(index).ok_or_else(|| {
            Error::internal(format!(
                "argument index {index} is out of range for a method of arity {arity}"
            ))
        })?;
        *slot = Some(argument);
        Ok(())
    }

    /// Whether the slot at `index` has been filled
    pub fn is_filled(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    /// Move the decoded value out of the slot at `index`
    pub fn take<T: 'static>(&mut self, index: usize) -> Result<T> {
        let argument = self
            .slots
            .get_mut(index)
            .and_then(Option::take)
            .ok_or_else(|| Error::internal(format!("argument {index} was not bound")))?;
        argument
            .value
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| {
                Error::internal(format!(
                    "argument {index} is not of type `{}`",
                    type_name::<T>()
                ))
            })
    }

    /// Raw JSON of every slot, `null` for unfilled ones
    pub fn raw_values(&self) -> Vec<Value> {
        self.slots
            .iter()
            .map(|slot| slot.as_ref().map_or(Value::Null, |a| a.raw.clone()))
            .collect()
    }
}
