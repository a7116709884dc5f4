//! HTTP transport
//!
//! Builds the Rocket application: one mount per controller, JSON catchers
//! for requests no route accepted, and a CORS fairing.

use std::sync::Arc;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Method, Status};
use rocket::{Build, Request, Response, Rocket, catch, catchers};
use tracing::info;
use trellis_domain::error::{Error, Result};
use trellis_infrastructure::config::ServerConfig;

use super::handler::{JsonResponse, mount_points};
use crate::constants::{CORS_ALLOWED_HEADERS, CORS_ALLOWED_METHODS, CORS_ANY_ORIGIN};
use crate::dispatch::{Dispatcher, generate_request_id, render_error};

/// HTTP transport server
pub struct HttpTransport {
    config: ServerConfig,
    dispatcher: Arc<Dispatcher>,
}

impl HttpTransport {
    /// Transport serving `dispatcher`
    pub fn new(config: ServerConfig, dispatcher: Arc<Dispatcher>) -> Self {
        Self { config, dispatcher }
    }

    /// Build the Rocket application
    pub fn rocket(&self) -> Rocket<Build> {
        let figment = rocket::Config::figment()
            .merge(("address", self.config.host.clone()))
            .merge(("port", self.config.port));

        let mut rocket = rocket::custom(figment)
            .register("/", catchers![not_found, fallback])
            .attach(Cors::new(self.config.cors_allowed_origins.clone()));
        for (base, routes) in mount_points(&self.dispatcher) {
            rocket = rocket.mount(base, routes);
        }
        rocket
    }

    /// Serve until Rocket shuts down
    pub async fn start(self) -> Result<()> {
        info!(
            host = %self.config.host,
            port = self.config.port,
            routes = self.dispatcher.routes().len(),
            "HTTP transport listening"
        );
        self.rocket()
            .launch()
            .await
            .map_err(|e| Error::infrastructure(format!("HTTP transport failed: {e}")))?;
        info!("HTTP transport stopped");
        Ok(())
    }
}

#[catch(404)]
fn not_found(request: &Request<'_>) -> JsonResponse {
    caught(
        request,
        Error::not_found(format!("{} {}", request.method(), request.uri().path())),
    )
}

#[catch(default)]
fn fallback(status: Status, request: &Request<'_>) -> JsonResponse {
    let error = if status.code >= 500 {
        Error::internal(format!("Transport failure: {status}"))
    } else {
        Error::service_with_status(status.reason_lossy(), status.code)
    };
    caught(request, error)
}

fn caught(request: &Request<'_>, error: Error) -> JsonResponse {
    let response = render_error(error, &generate_request_id());
    info!(
        host = %request.client_ip().map_or_else(|| String::from("-"), |ip| ip.to_string()),
        method = %request.method(),
        path = %request.uri().path(),
        status = response.status,
        request_id = %response.request_id,
        "request"
    );
    JsonResponse(response)
}

/// CORS fairing
///
/// Echoes the request origin when it is allowed, or `*` when every origin
/// is. Unrouted preflight requests are answered with `204`.
pub struct Cors {
    allowed_origins: Vec<String>,
}

impl Cors {
    /// Fairing allowing `allowed_origins`
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins }
    }

    fn allow_origin(&self, origin: Option<&str>) -> Option<String> {
        if self.allowed_origins.iter().any(|o| o == CORS_ANY_ORIGIN) {
            return Some(CORS_ANY_ORIGIN.to_string());
        }
        let origin = origin?;
        self.allowed_origins
            .iter()
            .any(|allowed| allowed == origin)
            .then(|| origin.to_string())
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS Headers",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let Some(origin) = self.allow_origin(request.headers().get_one("Origin")) else {
            return;
        };
        response.set_header(Header::new("Access-Control-Allow-Origin", origin));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            CORS_ALLOWED_METHODS,
        ));
        response.set_header(Header::new(
            "Access-Control-Allow-Headers",
            CORS_ALLOWED_HEADERS,
        ));
        if request.method() == Method::Options && response.status() == Status::NotFound {
            response.set_status(Status::NoContent);
            response.set_sized_body(0, std::io::Cursor::new(""));
        }
    }
}
