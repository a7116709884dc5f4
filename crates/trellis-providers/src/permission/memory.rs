//! In-memory role graph
//!
//! Users are assigned roles; roles are granted permissions. A user's
//! permissions are the union over its roles.

use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use trellis_domain::error::{Error, Result};
use trellis_domain::ports::PermissionProvider;

#[derive(Debug, Default)]
struct Grants {
    user_roles: HashMap<String, BTreeSet<String>>,
    role_permissions: HashMap<String, BTreeSet<String>>,
}

/// Role and permission store held in memory
#[derive(Debug, Default)]
pub struct InMemoryPermissionProvider {
    grants: RwLock<Grants>,
}

impl InMemoryPermissionProvider {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store where `role` starts with `permissions`
    #[must_use]
    pub fn with_role_permissions<I, S>(mut self, role: &str, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grants
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .role_permissions
            .entry(role.to_string())
            .or_default()
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Grants>> {
        self.grants
            .read()
            .map_err(|_| Error::internal("permission store lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Grants>> {
        self.grants
            .write()
            .map_err(|_| Error::internal("permission store lock poisoned"))
    }

    /// Assign `role` to `user_id`
    pub fn assign_role(&self, user_id: &str, role: &str) -> Result<()> {
        self.write()?
            .user_roles
            .entry(user_id.to_string())
            .or_default()
            .insert(role.to_string());
        Ok(())
    }

    /// Remove `role` from `user_id`; `true` if it was assigned
    pub fn revoke_role(&self, user_id: &str, role: &str) -> Result<bool> {
        Ok(self
            .write()?
            .user_roles
            .get_mut(user_id)
            .is_some_and(|roles| roles.remove(role)))
    }

    /// Grant `permission` to `role`
    pub fn grant_permission(&self, role: &str, permission: &str) -> Result<()> {
        self.write()?
            .role_permissions
            .entry(role.to_string())
            .or_default()
            .insert(permission.to_string());
        Ok(())
    }

    /// Withdraw `permission` from `role`; `true` if it was granted
    pub fn revoke_permission(&self, role: &str, permission: &str) -> Result<bool> {
        Ok(self
            .write()?
            .role_permissions
            .get_mut(role)
            .is_some_and(|permissions| permissions.remove(permission)))
    }

    /// Permissions granted to `role`
    pub fn permissions_of_role(&self, role: &str) -> Result<Vec<String>> {
        Ok(self
            .read()?
            .role_permissions
            .get(role)
            .map(|permissions| permissions.iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Drop every role assignment of `user_id`
    pub fn remove_user(&self, user_id: &str) -> Result<()> {
        self.write()?.user_roles.remove(user_id);
        Ok(())
    }
}

#[async_trait]
impl PermissionProvider for InMemoryPermissionProvider {
    async fn roles_of(&self, user_id: &str) -> Result<Vec<String>> {
        Ok(self
            .read()?
            .user_roles
            .get(user_id)
            .map(|roles| roles.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn permissions_of(&self, user_id: &str) -> Result<Vec<String>> {
        let grants = self.read()?;
        let Some(roles) = grants.user_roles.get(user_id) else {
            return Ok(Vec::new());
        };
        let permissions: BTreeSet<&String> = roles
            .iter()
            .filter_map(|role| grants.role_permissions.get(role))
            .flatten()
            .collect();
        Ok(permissions.into_iter().cloned().collect())
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}
