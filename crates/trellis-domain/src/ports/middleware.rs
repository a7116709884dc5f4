//! Route middleware port

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::InboundRequest;

/// Hook run before the dispatch pipeline of a route
///
/// Returning an error ends the request at the error boundary.
#[async_trait]
pub trait Middleware: Send + Sync + std::fmt::Debug {
    /// Middleware name, for logs
    fn name(&self) -> &str;

    /// Inspect the request
    async fn handle(&self, request: &InboundRequest) -> Result<()>;
}
