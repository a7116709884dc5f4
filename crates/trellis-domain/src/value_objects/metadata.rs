//! Typed metadata facts
//!
//! Facts are attached to a component type, or to one of its methods, when
//! the component is declared. They are read at startup by the container,
//! the route table builder and the job scheduler.

use super::binding::{ContextBinding, ParamBinding};
use super::cache_policy::CacheDirective;
use super::route::{RouteClassMetadata, RouteMetadata};
use super::schedule::ScheduleMetadata;
use super::signature::MethodSignature;

/// A single declared fact
#[derive(Debug, Clone)]
pub enum Metadata {
    /// Type is a controller with a route prefix
    RouteClass(RouteClassMetadata),
    /// Method handles an HTTP route
    Route(RouteMetadata),
    /// Method argument bound from the request
    Param(ParamBinding),
    /// Method argument receiving request context
    Context(ContextBinding),
    /// Method skips authentication
    NonAuth,
    /// Method requires every listed permission
    Permissions(Vec<String>),
    /// Method answers with a fixed status code
    StatusCode(u16),
    /// Method is wrapped by a cache decorator
    Cache(CacheDirective),
    /// Method runs on a cron schedule
    Schedule(ScheduleMetadata),
    /// Declared parameter names of the method
    Signature(MethodSignature),
}

impl Metadata {
    /// Short name of the fact kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RouteClass(_) => "route-class",
            Self::Route(_) => "route",
            Self::Param(_) => "param",
            Self::Context(_) => "context",
            Self::NonAuth => "non-auth",
            Self::Permissions(_) => "permissions",
            Self::StatusCode(_) => "status-code",
            Self::Cache(_) => "cache",
            Self::Schedule(_) => "schedule",
            Self::Signature(_) => "signature",
        }
    }
}
