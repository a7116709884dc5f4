//! Rocket glue for bound routes
//!
//! Every [`BoundRoute`](crate::routing::BoundRoute) is mounted as a Rocket
//! [`Route`] whose handler converts the request into an
//! [`InboundRequest`] and hands it to the [`Dispatcher`].

use std::io::Cursor;
use std::sync::Arc;

use rocket::data::ToByteUnit;
use rocket::http::{ContentType, Method, Status};
use rocket::response::{self, Responder};
use rocket::route::{Handler, Outcome, Route};
use rocket::{Data, Request, Response};
use trellis_domain::error::Error;
use trellis_domain::value_objects::{HttpMethod, InboundRequest};

use crate::constants::{DEFAULT_BODY_LIMIT_BYTES, REQUEST_ID_HEADER};
use crate::dispatch::{DispatchResponse, Dispatcher, generate_request_id, render_error};
use crate::routing::RouteTable;

/// JSON response of a dispatched request
#[derive(Debug)]
pub struct JsonResponse(pub DispatchResponse);

impl<'r> Responder<'r, 'static> for JsonResponse {
    fn respond_to(self, _request: &'r Request<'_>) -> response::Result<'static> {
        let DispatchResponse {
            status,
            body,
            request_id,
        } = self.0;
        let body = body.to_string();
        Response::build()
            .status(Status::from_code(status).unwrap_or(Status::InternalServerError))
            .header(ContentType::JSON)
            .raw_header(REQUEST_ID_HEADER, request_id)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

/// Handler of one bound route
#[derive(Clone)]
pub struct RouteHandler {
    dispatcher: Arc<Dispatcher>,
    index: usize,
}

#[rocket::async_trait]
impl Handler for RouteHandler {
    async fn handle<'r>(&self, request: &'r Request<'_>, data: Data<'r>) -> Outcome<'r> {
        let Ok(method) = request.method().as_str().parse::<HttpMethod>() else {
            return Outcome::forward(data, Status::NotFound);
        };
        let limit = request
            .limits()
            .get("json")
            .unwrap_or_else(|| DEFAULT_BODY_LIMIT_BYTES.bytes());
        let body = match data.open(limit).into_bytes().await {
            Ok(bytes) if bytes.is_complete() => bytes.into_inner(),
            Ok(_) => return rejected(request, Error::validation("Request body is too large.")),
            Err(e) => {
                return rejected(
                    request,
                    Error::infrastructure_with_source("Failed to read request body", e),
                );
            }
        };

        let inbound = inbound_request(request, method, body);
        let response = self.dispatcher.dispatch_route(self.index, inbound).await;
        Outcome::from(request, JsonResponse(response))
    }
}

fn rejected<'r>(request: &'r Request<'_>, error: Error) -> Outcome<'r> {
    Outcome::from(request, JsonResponse(render_error(error, &generate_request_id())))
}

/// Transport-independent view of a Rocket request
pub fn inbound_request(request: &Request<'_>, method: HttpMethod, body: Vec<u8>) -> InboundRequest {
    let segments: Vec<&str> = request.uri().path().segments().collect();
    let mut inbound = InboundRequest::new(method, format!("/{}", segments.join("/")));

    if let Some(query) = request.uri().query() {
        for (name, value) in query.segments() {
            inbound.push_query(name.to_string(), value.to_string());
        }
    }
    for header in request.headers().iter() {
        inbound = inbound.with_header(header.name().as_str(), header.value().to_string());
    }
    inbound.host = request
        .client_ip()
        .map(|ip| ip.to_string())
        .or_else(|| request.host().map(|host| host.to_string()))
        .unwrap_or_else(|| String::from("-"));
    inbound.body = body;
    inbound
}

/// Rocket verb of an HTTP method
pub fn rocket_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::Get,
        HttpMethod::Post => Method::Post,
        HttpMethod::Put => Method::Put,
        HttpMethod::Patch => Method::Patch,
        HttpMethod::Delete => Method::Delete,
        HttpMethod::Head => Method::Head,
        HttpMethod::Options => Method::Options,
    }
}

/// Rocket routes of every controller
///
/// Each controller is one mount carrying its full paths. Ranks follow the
/// table's matching order so Rocket and [`RouteTable::find`] pick the same
/// route and same-shaped paths never collide.
pub fn mount_points(dispatcher: &Arc<Dispatcher>) -> Vec<(&'static str, Vec<Route>)> {
    let table: &RouteTable = dispatcher.routes();
    let mut order: Vec<usize> = (0..table.len()).collect();
    order.sort_by_key(|&index| (table.routes()[index].pattern.rank(), index));
    let mut ranks = vec![0_isize; table.len()];
    for (rank, index) in order.into_iter().enumerate() {
        ranks[index] = isize::try_from(rank).unwrap_or(isize::MAX);
    }

    table
        .controllers()
        .iter()
        .map(|group| {
            let routes = group
                .routes
                .iter()
                .map(|&index| {
                    let route = &table.routes()[index];
                    Route::ranked(
                        ranks[index],
                        rocket_method(route.http_method),
                        &route.pattern.to_rocket(),
                        RouteHandler {
                            dispatcher: Arc::clone(dispatcher),
                            index,
                        },
                    )
                })
                .collect();
            ("/", routes)
        })
        .collect()
}
