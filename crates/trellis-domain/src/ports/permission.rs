//! Role and permission lookup port

use async_trait::async_trait;

use crate::error::Result;

/// Resolves the roles and permissions of a user
///
/// Permissions are granted to roles; a user holds the union of the
/// permissions of all its roles.
#[async_trait]
pub trait PermissionProvider: Send + Sync + std::fmt::Debug {
    /// Role names held by the user
    async fn roles_of(&self, user_id: &str) -> Result<Vec<String>>;

    /// Permission names reachable through the user's roles
    async fn permissions_of(&self, user_id: &str) -> Result<Vec<String>>;

    /// Provider name
    fn provider_name(&self) -> &str;
}
