//! Account constants

/// Role assigned to every registered user
pub const DEFAULT_ROLE: &str = "USER";

/// List and read users
pub const PERMISSION_USER_READ: &str = "user:read";

/// Change another user's profile
pub const PERMISSION_USER_UPDATE: &str = "user:update";

/// Delete users
pub const PERMISSION_USER_DELETE: &str = "user:delete";

/// Inspect roles and their permissions
pub const PERMISSION_ROLE_READ: &str = "role:read";

/// Grant and withdraw permissions, assign and revoke roles
pub const PERMISSION_ROLE_UPDATE: &str = "role:update";

/// Permissions [`DEFAULT_ROLE`] starts with
pub const DEFAULT_ROLE_PERMISSIONS: &[&str] = &[PERMISSION_USER_READ];

/// Cache scope of user profiles
pub const USER_CACHE_SCOPE: &str = "Users";

/// Seconds a cached profile stays valid
pub const USER_CACHE_TTL_SECS: i64 = 120;

/// Job scope of account maintenance
pub const MAINTENANCE_JOB_SCOPE: &str = "cleanup";

/// Purge deactivated accounts every night at 03:00 UTC
pub const MAINTENANCE_CRON: &str = "0 0 3 * * *";

/// Default page size of user listings
pub const DEFAULT_PAGE_SIZE: usize = 20;
