//! Role-based access control for accounts
//!
//! [`AccessControl`] and [`UserService`] depend on each other: roles can
//! only be assigned to existing users, and registering a user assigns the
//! default role. Both sides declare the other as a deferred constructor
//! parameter resolved by name.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use trellis_domain::error::{Error, Result};
use trellis_domain::ports::PermissionProvider;
use trellis_infrastructure::di::{Declaration, Inject, Injectable, Named};
use trellis_providers::InMemoryPermissionProvider;

use super::constants::{DEFAULT_ROLE, DEFAULT_ROLE_PERMISSIONS};
use super::service::UserService;

#[derive(Debug)]
pub struct AccessControl {
    grants: InMemoryPermissionProvider,
    users: Inject<UserService>,
}

impl Named for AccessControl {
    const NAME: &'static str = "AccessControl";
}

impl Injectable for AccessControl {
    fn instantiate() -> Self {
        Self {
            grants: InMemoryPermissionProvider::new()
                .with_role_permissions(DEFAULT_ROLE, DEFAULT_ROLE_PERMISSIONS.iter().copied()),
            users: Inject::new(),
        }
    }

    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration
            .inject_deferred::<UserService>(|this| &this.users)
            .circular_inject(0, || UserService::NAME)
    }
}

impl AccessControl {
    fn users(&self) -> Result<&Arc<UserService>> {
        self.users.get()
    }

    /// Assign `role` to an existing user
    pub fn assign_role(&self, user_id: u64, role: &str) -> Result<()> {
        if !self.users()?.exists(user_id)? {
            return Err(Error::not_found(format!("user {user_id}")));
        }
        self.grants.assign_role(&user_id.to_string(), role)?;
        info!(user_id, role, "role assigned");
        Ok(())
    }

    /// Remove `role` from a user; `true` if it was assigned
    pub fn revoke_role(&self, user_id: u64, role: &str) -> Result<bool> {
        self.grants.revoke_role(&user_id.to_string(), role)
    }

    pub fn grant_permission(&self, role: &str, permission: &str) -> Result<()> {
        self.grants.grant_permission(role, permission)
    }

    pub fn revoke_permission(&self, role: &str, permission: &str) -> Result<bool> {
        self.grants.revoke_permission(role, permission)
    }

    pub fn permissions_of_role(&self, role: &str) -> Result<Vec<String>> {
        self.grants.permissions_of_role(role)
    }

    /// Drop every role of a deleted user
    pub fn forget(&self, user_id: u64) -> Result<()> {
        self.grants.remove_user(&user_id.to_string())
    }
}

#[async_trait]
impl PermissionProvider for AccessControl {
    async fn roles_of(&self, user_id: &str) -> Result<Vec<String>> {
        self.grants.roles_of(user_id).await
    }

    async fn permissions_of(&self, user_id: &str) -> Result<Vec<String>> {
        self.grants.permissions_of(user_id).await
    }

    fn provider_name(&self) -> &str {
        "accounts"
    }
}
