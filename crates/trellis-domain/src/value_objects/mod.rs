//! Domain Value Objects
//!
//! Immutable facts attached to component types and their methods, plus the
//! per-request values that flow through the dispatch pipeline.
//!
//! ## Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`RouteMetadata`] | HTTP verb, path and middlewares of a handler method |
//! | [`RouteClassMetadata`] | Route prefix of a controller type |
//! | [`ParamBinding`] | Where a handler argument is read from and how it is decoded |
//! | [`ContextBinding`] | Request context slice injected into a handler argument |
//! | [`CachePolicy`] | Scope, key template and TTL of a cache-aside decorator |
//! | [`ScheduleMetadata`] | Cron expression and enabling scope of a job method |
//! | [`MethodSignature`] | Declared parameter names used to resolve cache keys |
//! | [`RequestContext`] | Request-scoped data exposed to handlers |
//! | [`ArgSlots`] | Positional handler arguments allocated per dispatch |
//! | [`Metadata`] | Typed fact stored in the metadata registry |

/// Positional handler arguments and invoker types
pub mod arguments;
/// Parameter and context binding descriptions
pub mod binding;
/// Cache-aside policies and time units
pub mod cache_policy;
/// Typed metadata facts
pub mod metadata;
/// Request-scoped values
pub mod request;
/// Route declarations
pub mod route;
/// Scheduled job declarations
pub mod schedule;
/// Declared method signatures
pub mod signature;

pub use arguments::{ArgSlots, Argument, Instance, Invoker, JobInvoker, MethodFuture};
pub use binding::{
    BindTarget, Binder, ContextBinding, ContextSource, FieldCoercion, ParamBinding, ParamSource,
    ScalarKind, bind_value, validation_messages,
};
pub use cache_policy::{CacheDirective, CacheOperation, CachePolicy, TimeUnit};
pub use metadata::Metadata;
pub use request::{InboundRequest, RequestContext};
pub use route::{HttpMethod, RouteClassMetadata, RouteMetadata};
pub use schedule::ScheduleMetadata;
pub use signature::MethodSignature;
