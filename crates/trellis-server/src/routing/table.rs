//! Route table builder
//!
//! Reads the controller facts of a frozen [`Container`] and binds every
//! routed method to its singleton. Metadata lookups happen once here; the
//! dispatch pipeline only reads the resulting [`BoundRoute`]s.
//!
//! Every inconsistency is a fatal [`Error::RouteInitialization`].

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};
use trellis_application::decorators::decorate_invoker;
use trellis_domain::error::{Error, Result};
use trellis_domain::ports::Middleware;
use trellis_domain::value_objects::{
    ContextBinding, HttpMethod, Instance, Invoker, ParamBinding, ParamSource,
};
use trellis_infrastructure::cache::CacheService;
use trellis_infrastructure::di::Container;

use super::path::{PathPattern, join_route_path};
use crate::constants::DEFAULT_SUCCESS_STATUS;

/// A handler method bound to its singleton
#[derive(Clone)]
pub struct BoundRoute {
    /// Owning controller
    pub component: &'static str,
    /// Handler method
    pub method_name: &'static str,
    /// HTTP verb
    pub http_method: HttpMethod,
    /// Controller prefix
    pub prefix: PathPattern,
    /// Method path relative to the prefix
    pub relative: PathPattern,
    /// Full path
    pub pattern: PathPattern,
    /// Whether authentication is skipped
    pub non_auth: bool,
    /// Permissions the caller must hold
    pub permissions: Vec<String>,
    /// Parameter bindings
    pub params: Vec<ParamBinding>,
    /// Context bindings
    pub contexts: Vec<ContextBinding>,
    /// Success status
    pub status: u16,
    /// Positional argument count
    pub arity: usize,
    /// Hooks run before the pipeline
    pub middlewares: Vec<Arc<dyn Middleware>>,
    /// Entry point, cache decorators applied
    pub invoker: Invoker,
    /// Owning singleton
    pub instance: Instance,
}

impl BoundRoute {
    /// `VERB /path`
    pub fn label(&self) -> String {
        format!("{} {}", self.http_method, self.pattern)
    }
}

impl fmt::Debug for BoundRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundRoute")
            .field("route", &self.label())
            .field("handler", &format_args!("{}.{}", self.component, self.method_name))
            .field("non_auth", &self.non_auth)
            .field("permissions", &self.permissions)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Routes of one controller
#[derive(Debug, Clone)]
pub struct ControllerRoutes {
    /// Controller component
    pub component: &'static str,
    /// Shared prefix
    pub prefix: PathPattern,
    /// Indices into [`RouteTable::routes`]
    pub routes: Vec<usize>,
}

/// Every bound route, grouped per controller
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<BoundRoute>,
    controllers: Vec<ControllerRoutes>,
}

impl RouteTable {
    /// Bind every routed method of `container`
    ///
    /// Cache directives wrap their handler through `cache`; declaring one
    /// without a cache service is an error.
    pub fn build(container: &Container, cache: Option<&CacheService>) -> Result<Self> {
        let metadata = container.metadata();
        for class in container.classes() {
            if metadata.route_class(class.name).is_none()
                && metadata
                    .members(class.name)
                    .iter()
                    .any(|member| metadata.route(class.name, member).is_some())
            {
                return Err(Error::route_initialization(format!(
                    "Route class metadata is undefined. class: \"{}\"",
                    class.name
                )));
            }
        }

        let mut table = Self::default();
        let mut shapes: HashMap<(HttpMethod, String), String> = HashMap::new();
        for component in container.controllers() {
            let Some(class) = container.class_metadata(component) else {
                continue;
            };
            let Some(route_class) = metadata.route_class(component) else {
                continue;
            };
            let prefix = PathPattern::parse(&route_class.prefix)?;
            let instance = container
                .instance(component)
                .map_err(|e| Error::route_initialization(e.public_message()))?;

            let mut group = ControllerRoutes {
                component,
                prefix: prefix.clone(),
                routes: Vec::new(),
            };
            for member in metadata.members(component) {
                let Some(route) = metadata.route(component, member) else {
                    continue;
                };
                let handler = format!("{component}.{member}");
                let method = class.method(member);
                let Some(invoker) = method.and_then(|m| m.invoker.clone()) else {
                    return Err(Error::route_initialization(format!(
                        "Route handler is undefined. class: \"{component}\", method: \"{member}\""
                    )));
                };
                let relative = PathPattern::parse(&route.path)?;
                let pattern =
                    PathPattern::parse(&join_route_path(prefix.as_str(), relative.as_str()))?;

                let shape = (route.method, pattern.shape());
                if let Some(existing) = shapes.get(&shape) {
                    return Err(Error::route_initialization(format!(
                        "Duplicate route \"{} {pattern}\" declared by {existing} and {handler}",
                        route.method
                    )));
                }
                shapes.insert(shape, handler.clone());

                let params: Vec<ParamBinding> =
                    metadata.params(component, member).into_iter().cloned().collect();
                let declared = pattern.param_names();
                for binding in &params {
                    if let (ParamSource::Path, Some(key)) = (binding.source, &binding.key)
                        && !declared.contains(&key.as_str())
                    {
                        return Err(Error::route_initialization(format!(
                            "Path parameter \"{key}\" of {handler} is not declared in route \"{} {pattern}\"",
                            route.method
                        )));
                    }
                }

                let contexts = metadata.contexts(component, member);
                let mut bound = HashSet::new();
                let indices = params
                    .iter()
                    .map(|binding| binding.index)
                    .chain(contexts.iter().map(|binding| binding.index));
                for index in indices {
                    if !bound.insert(index) {
                        return Err(Error::route_initialization(format!(
                            "Argument {index} of {handler} is bound more than once"
                        )));
                    }
                }

                let status = metadata
                    .status_code(component, member)
                    .unwrap_or(DEFAULT_SUCCESS_STATUS);
                if !(100..=599).contains(&status) {
                    return Err(Error::route_initialization(format!(
                        "Status code {status} of {handler} is not a valid HTTP status"
                    )));
                }

                let directives = metadata.cache_directives(component, member);
                let invoker = if directives.is_empty() {
                    invoker
                } else {
                    let Some(cache) = cache else {
                        return Err(Error::route_initialization(format!(
                            "Cache decorators of {handler} require a cache service"
                        )));
                    };
                    let signature = metadata.signature(component, member).cloned();
                    // Innermost first so the first declared directive runs outermost
                    directives.iter().rev().fold(invoker, |inner, directive| {
                        decorate_invoker(
                            inner,
                            (*directive).clone(),
                            signature.clone(),
                            cache.aside(),
                        )
                    })
                };

                debug!(route = %format!("{} {pattern}", route.method), handler = %handler, "route bound");
                group.routes.push(table.routes.len());
                table.routes.push(BoundRoute {
                    component,
                    method_name: member,
                    http_method: route.method,
                    prefix: prefix.clone(),
                    relative,
                    pattern,
                    non_auth: metadata.is_non_auth(component, member),
                    permissions: metadata.permissions(component, member),
                    params,
                    contexts,
                    status,
                    arity: method.map_or(0, |m| m.arity),
                    middlewares: route.middlewares.clone(),
                    invoker,
                    instance: instance.clone(),
                });
            }
            table.controllers.push(group);
        }

        info!(
            routes = table.routes.len(),
            controllers = table.controllers.len(),
            "route table built"
        );
        Ok(table)
    }

    /// Bound routes in declaration order
    pub fn routes(&self) -> &[BoundRoute] {
        &self.routes
    }

    /// Route at `index`
    pub fn get(&self, index: usize) -> Option<&BoundRoute> {
        self.routes.get(index)
    }

    /// Routes grouped per controller
    pub fn controllers(&self) -> &[ControllerRoutes] {
        &self.controllers
    }

    /// Number of routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no route is bound
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Best route for a request and its captured segments
    ///
    /// Among matching routes, static segments win over captures position by
    /// position, so `/users/login` is preferred to `/users/:id`.
    pub fn find(&self, method: HttpMethod, path: &str) -> Option<(usize, Map<String, Value>)> {
        self.routes
            .iter()
            .enumerate()
            .filter(|(_, route)| route.http_method == method)
            .filter_map(|(index, route)| {
                route
                    .pattern
                    .matches(path)
                    .map(|params| (route.pattern.rank(), index, params))
            })
            .min_by(|a, b| a.0.cmp(&b.0))
            .map(|(_, index, params)| (index, params))
    }

    /// One line per route, `VERB path -> Component.method`
    pub fn describe(&self) -> Vec<String> {
        self.routes
            .iter()
            .map(|route| {
                format!(
                    "{:<7} {} -> {}.{}",
                    route.http_method.as_str(),
                    route.pattern,
                    route.component,
                    route.method_name
                )
            })
            .collect()
    }
}
