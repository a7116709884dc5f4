//! Request dispatch
//!
//! - [`pipeline`] - the per-request state machine
//! - [`auth`] - bearer credential and session check
//! - [`permission`] - declared permission check
//! - [`binding`] - argument slots from request sections
//! - [`boundary`] - error envelope rendering
//! - [`request_id`] - correlation ids

pub mod auth;
pub mod binding;
pub mod boundary;
pub mod permission;
pub mod pipeline;
pub mod request_id;

pub use auth::Authenticator;
pub use boundary::{DispatchResponse, ErrorEnvelope, render_error};
pub use permission::PermissionGuard;
pub use pipeline::Dispatcher;
pub use request_id::generate_request_id;
