//! Tests for the in-memory role graph

use trellis_domain::ports::PermissionProvider;
use trellis_providers::InMemoryPermissionProvider;

fn seeded() -> InMemoryPermissionProvider {
    let provider = InMemoryPermissionProvider::new();
    provider.grant_permission("READER", "user:read").unwrap();
    provider.grant_permission("EDITOR", "user:read").unwrap();
    provider.grant_permission("EDITOR", "user:update").unwrap();
    provider.assign_role("1", "READER").unwrap();
    provider.assign_role("1", "EDITOR").unwrap();
    provider
}

#[tokio::test]
async fn permissions_are_the_union_over_roles() {
    let provider = seeded();

    assert_eq!(provider.roles_of("1").await.unwrap(), vec!["EDITOR", "READER"]);
    assert_eq!(
        provider.permissions_of("1").await.unwrap(),
        vec!["user:read", "user:update"]
    );
}

#[tokio::test]
async fn unknown_user_has_nothing() {
    let provider = seeded();
    assert!(provider.roles_of("2").await.unwrap().is_empty());
    assert!(provider.permissions_of("2").await.unwrap().is_empty());
}

#[tokio::test]
async fn revocation_takes_effect() {
    let provider = seeded();

    assert!(provider.revoke_role("1", "EDITOR").unwrap());
    assert!(!provider.revoke_role("1", "EDITOR").unwrap());
    assert_eq!(provider.permissions_of("1").await.unwrap(), vec!["user:read"]);

    assert!(provider.revoke_permission("READER", "user:read").unwrap());
    assert!(provider.permissions_of("1").await.unwrap().is_empty());

    provider.remove_user("1").unwrap();
    assert!(provider.roles_of("1").await.unwrap().is_empty());
}

#[test]
fn roles_can_start_with_permissions() {
    let provider = InMemoryPermissionProvider::new()
        .with_role_permissions("USER", ["user:read"])
        .with_role_permissions("USER", ["user:update"]);
    assert_eq!(
        provider.permissions_of_role("USER").unwrap(),
        vec!["user:read", "user:update"]
    );
}
