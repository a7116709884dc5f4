//! # Trellis Server
//!
//! Turns a frozen component graph into an HTTP service.
//!
//! ## Request flow
//!
//! ```text
//! Rocket ──▶ RouteHandler ──▶ Dispatcher ──▶ BoundRoute.invoker ──▶ singleton
//!                                 │
//!                                 └──▶ error boundary ──▶ { requestId, message, code }
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Application`] | Bootstrapped application and its lifecycle |
//! | [`ApplicationBuilder`] | Configuration, registry, permissions and hooks |
//! | [`RouteTable`] | Routed methods bound to their singletons |
//! | [`Dispatcher`] | Per-request pipeline |
//! | [`HttpTransport`] | Rocket application |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trellis_server::Application;
//!
//! #[tokio::main]
//! async fn main() -> trellis_domain::Result<()> {
//!     Application::builder().build()?.run().await
//! }
//! ```

pub mod app;
pub mod builder;
pub mod constants;
pub mod dispatch;
pub mod routing;
pub mod transport;

pub use app::Application;
pub use builder::{ApplicationBuilder, LifecycleHook};
pub use dispatch::{DispatchResponse, Dispatcher, ErrorEnvelope};
pub use routing::RouteTable;
pub use transport::HttpTransport;
