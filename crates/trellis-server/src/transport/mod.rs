//! Transport layer
//!
//! Rocket carries requests to the [`Dispatcher`](crate::dispatch::Dispatcher);
//! nothing outside this module depends on Rocket types.

pub mod handler;
pub mod http;

pub use handler::{JsonResponse, RouteHandler, inbound_request};
pub use http::{Cors, HttpTransport};
