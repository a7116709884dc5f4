//! Request dispatch pipeline
//!
//! ```text
//! middlewares → authenticate → authorize → bind → context → invoke → respond
//!                                                                     │
//!            any failure ──────────────▶ error boundary ──────────────┤
//!                                                                     ▼
//!                                                         one log line per request
//! ```
//!
//! Each step short-circuits on failure. Authentication and the permission
//! check run before the body is parsed, so rejected requests never reach
//! parameter binding.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};
use tracing::info;
use trellis_domain::error::{Error, Result};
use trellis_domain::value_objects::{InboundRequest, RequestContext};

use super::auth::Authenticator;
use super::binding::{bind_arguments, parse_body};
use super::boundary::{DispatchResponse, render_error};
use super::permission::PermissionGuard;
use super::request_id::generate_request_id;
use crate::routing::{BoundRoute, RouteTable};

/// Runs requests through the pipeline
#[derive(Debug, Clone)]
pub struct Dispatcher {
    routes: Arc<RouteTable>,
    authenticator: Authenticator,
    permissions: PermissionGuard,
}

impl Dispatcher {
    /// Dispatcher over `routes`
    ///
    /// Fails when a route declares permissions and `permissions` has no
    /// provider to check them with.
    pub fn new(
        routes: RouteTable,
        authenticator: Authenticator,
        permissions: PermissionGuard,
    ) -> Result<Self> {
        if !permissions.is_enabled()
            && let Some(route) = routes
                .routes()
                .iter()
                .find(|route| !route.permissions.is_empty())
        {
            return Err(Error::route_initialization(format!(
                "Route \"{}\" declares permissions but no permission provider is configured",
                route.label()
            )));
        }
        Ok(Self {
            routes: Arc::new(routes),
            authenticator,
            permissions,
        })
    }

    /// Bound routes
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Dispatch a request to the best matching route
    pub async fn dispatch(&self, request: InboundRequest) -> DispatchResponse {
        let started = Instant::now();
        let request_id = generate_request_id();
        let outcome = match self.routes.find(request.method, &request.path) {
            Some((index, params)) => {
                let route = &self.routes.routes()[index];
                self.run(route, params, &request, &request_id).await
            }
            None => Err(Error::not_found(format!("{} {}", request.method, request.path))),
        };
        finish(outcome, &request, request_id, started)
    }

    /// Dispatch a request already matched to the route at `index`
    pub async fn dispatch_route(&self, index: usize, request: InboundRequest) -> DispatchResponse {
        let started = Instant::now();
        let request_id = generate_request_id();
        let outcome = match self.routes.get(index) {
            Some(route) => {
                let params = route.pattern.matches(&request.path).unwrap_or_default();
                self.run(route, params, &request, &request_id).await
            }
            None => Err(Error::not_found(format!("{} {}", request.method, request.path))),
        };
        finish(outcome, &request, request_id, started)
    }

    async fn run(
        &self,
        route: &BoundRoute,
        params: Map<String, Value>,
        request: &InboundRequest,
        request_id: &str,
    ) -> Result<(u16, Value)> {
        for middleware in &route.middlewares {
            middleware.handle(request).await?;
        }

        let user_id = if route.non_auth {
            None
        } else {
            let user_id = self.authenticator.authenticate(request).await?;
            self.permissions.check(&user_id, &route.permissions).await?;
            Some(user_id)
        };

        let context = RequestContext {
            request_id: request_id.to_string(),
            user_id,
            method: request.method,
            path: request.path.clone(),
            host: request.host.clone(),
            query: Value::Object(request.query.clone()),
            params: Value::Object(params),
            headers: Value::Object(request.headers.clone()),
            body: parse_body(&request.body)?,
        };
        let args = bind_arguments(route, &context)?;

        let value = (route.invoker)(Arc::clone(&route.instance), args).await?;
        Ok((route.status, value))
    }
}

fn finish(
    outcome: Result<(u16, Value)>,
    request: &InboundRequest,
    request_id: String,
    started: Instant,
) -> DispatchResponse {
    let response = match outcome {
        Ok((status, body)) => DispatchResponse {
            status,
            body,
            request_id,
        },
        Err(error) => render_error(error, &request_id),
    };
    info!(
        host = %request.host,
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        method = %request.method,
        path = %request.path,
        status = response.status,
        request_id = %response.request_id,
        "request"
    );
    response
}
