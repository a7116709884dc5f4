//! Permission check

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;
use trellis_domain::error::{Error, Result};
use trellis_domain::ports::PermissionProvider;

/// Message of every permission failure
pub const PERMISSION_DENIED: &str = "Permission denied.";

/// Requires the caller to hold every declared permission
///
/// Users holding a privileged role skip the check.
#[derive(Debug, Clone, Default)]
pub struct PermissionGuard {
    provider: Option<Arc<dyn PermissionProvider>>,
    privileged_roles: Vec<String>,
}

impl PermissionGuard {
    /// Guard backed by `provider`
    pub fn new(provider: Arc<dyn PermissionProvider>, privileged_roles: Vec<String>) -> Self {
        Self {
            provider: Some(provider),
            privileged_roles,
        }
    }

    /// Guard without a provider; any declared permission is denied
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether a provider is configured
    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Check `user_id` against `required`
    pub async fn check(&self, user_id: &str, required: &[String]) -> Result<()> {
        if required.is_empty() {
            return Ok(());
        }
        let Some(provider) = &self.provider else {
            return Err(Error::authentication(PERMISSION_DENIED));
        };

        let roles = provider.roles_of(user_id).await?;
        if roles.iter().any(|role| self.privileged_roles.contains(role)) {
            debug!(user_id, "privileged role, permission check skipped");
            return Ok(());
        }

        let granted: HashSet<String> = provider.permissions_of(user_id).await?.into_iter().collect();
        if let Some(missing) = required.iter().find(|p| !granted.contains(p.as_str())) {
            debug!(user_id, permission = %missing, "permission denied");
            return Err(Error::authentication(PERMISSION_DENIED));
        }
        Ok(())
    }
}
