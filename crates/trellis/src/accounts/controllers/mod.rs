//! Account controllers

mod roles;
mod system;
mod users;

pub use roles::{PermissionController, RoleController};
pub use system::{AccountMaintenance, PingController};
pub use users::UserController;
