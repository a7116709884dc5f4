//! Account management application
//!
//! Registration, login sessions, user profiles and role-based access,
//! assembled entirely from components discovered at link time.
//!
//! | Component | Role |
//! |-----------|------|
//! | [`UserStore`] | In-memory user records |
//! | [`UserService`] | Registration, login, profile use cases |
//! | [`AccessControl`] | Roles and permissions; the permission provider |
//! | [`UserController`] | `/users` |
//! | [`RoleController`] | `/roles` |
//! | [`PermissionController`] | `/permissions` |
//! | [`PingController`] | `/ping` |
//! | [`AccountMaintenance`] | Nightly purge of deactivated accounts |
//!
//! [`UserService`] and [`AccessControl`] reference each other through
//! deferred constructor parameters.

pub mod access;
pub mod constants;
pub mod controllers;
pub mod dto;
pub mod service;
pub mod store;

pub use access::AccessControl;
pub use controllers::{
    AccountMaintenance, PermissionController, PingController, RoleController, UserController,
};
pub use service::UserService;
pub use store::UserStore;

use trellis_infrastructure::di::{COMPONENTS, ComponentEntry};
use trellis_server::{Application, ApplicationBuilder};

/// Builder of the account application with [`AccessControl`] checking permissions
pub fn application() -> ApplicationBuilder {
    Application::builder().with_permission_component::<AccessControl>()
}

#[linkme::distributed_slice(COMPONENTS)]
static USER_STORE: ComponentEntry = ComponentEntry::of::<UserStore>();

#[linkme::distributed_slice(COMPONENTS)]
static USER_SERVICE: ComponentEntry = ComponentEntry::of::<UserService>();

#[linkme::distributed_slice(COMPONENTS)]
static ACCESS_CONTROL: ComponentEntry = ComponentEntry::of::<AccessControl>();

#[linkme::distributed_slice(COMPONENTS)]
static USER_CONTROLLER: ComponentEntry = ComponentEntry::of::<UserController>();

#[linkme::distributed_slice(COMPONENTS)]
static ROLE_CONTROLLER: ComponentEntry = ComponentEntry::of::<RoleController>();

#[linkme::distributed_slice(COMPONENTS)]
static PERMISSION_CONTROLLER: ComponentEntry = ComponentEntry::of::<PermissionController>();

#[linkme::distributed_slice(COMPONENTS)]
static PING_CONTROLLER: ComponentEntry = ComponentEntry::of::<PingController>();

#[linkme::distributed_slice(COMPONENTS)]
static ACCOUNT_MAINTENANCE: ComponentEntry = ComponentEntry::of::<AccountMaintenance>();
