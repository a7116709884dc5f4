//! Account flows through the dispatch pipeline

use std::time::Duration;

use serde_json::json;
use trellis::accounts::UserService;
use trellis::infrastructure::SessionService;
use trellis::infrastructure::crypto::Claims;

use crate::test_utils::{Accounts, PASSWORD, bearer, delete, get, post, put};

#[tokio::test]
async fn login_issues_token_and_opens_session() {
    let accounts = Accounts::new();
    let id = accounts.register("alice").await;

    let response = accounts
        .send(put(
            "/users/login",
            &json!({ "username": "alice", "password": PASSWORD }),
        ))
        .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body["userId"], json!(id));
    let token = response.body["token"].as_str().unwrap();
    let stored: Option<String> = accounts
        .cache()
        .get(&format!("userToken@{id}"))
        .await
        .unwrap();
    assert_eq!(stored.as_deref(), Some(token));
    let sessions = accounts.app.container().get::<SessionService>().unwrap();
    assert_eq!(sessions.ttl_days(), 30);
}

#[tokio::test]
async fn session_marker_is_stored_for_thirty_days() {
    let (accounts, cache) = Accounts::recorded();
    let (id, token) = accounts.signed_in("alice", None).await;

    let writes = cache.writes_to(&format!("userToken@{id}"));
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].ttl, Some(Duration::from_secs(30 * 86_400)));

    let stored: Option<String> = accounts
        .cache()
        .get(&format!("userToken@{id}"))
        .await
        .unwrap();
    assert_eq!(stored.as_deref(), Some(token.as_str()));
}

#[tokio::test]
async fn cached_profile_is_stored_for_its_declared_ttl() {
    let (accounts, cache) = Accounts::recorded();
    let (id, token) = accounts.signed_in("alice", None).await;

    let response = accounts
        .send(bearer(get(&format!("/users/{id}")), &token))
        .await;
    assert_eq!(response.status, 200);

    let writes = cache.writes_to(&format!("Users@{id}"));
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].ttl, Some(Duration::from_secs(120)));
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let accounts = Accounts::new();
    accounts.register("alice").await;

    let unknown = accounts
        .send(put(
            "/users/login",
            &json!({ "username": "nobody", "password": PASSWORD }),
        ))
        .await;
    assert_eq!(unknown.status, 400);
    assert_eq!(unknown.envelope().unwrap().message, "`username` not found.");

    let wrong = accounts
        .send(put(
            "/users/login",
            &json!({ "username": "alice", "password": "not-the-password" }),
        ))
        .await;
    assert_eq!(wrong.status, 400);
    assert_eq!(wrong.envelope().unwrap().message, "Password is not matched.");
}

#[tokio::test]
async fn registration_enforces_rules() {
    let accounts = Accounts::new();
    accounts.register("alice").await;

    let mismatch = accounts
        .send(post(
            "/users/register",
            &json!({ "username": "bob", "password": PASSWORD, "confirmedPassword": "other-pass" }),
        ))
        .await;
    assert_eq!(mismatch.status, 400);
    assert_eq!(
        mismatch.envelope().unwrap().message,
        "`password` is not matched with `confirmedPassword`."
    );

    let duplicate = accounts
        .send(post(
            "/users/register",
            &json!({ "username": "alice", "password": PASSWORD, "confirmedPassword": PASSWORD }),
        ))
        .await;
    assert_eq!(duplicate.envelope().unwrap().message, "`username` has exists.");

    let invalid = accounts
        .send(post(
            "/users/register",
            &json!({ "username": "al", "password": PASSWORD, "confirmedPassword": PASSWORD, "age": "200" }),
        ))
        .await;
    let envelope = invalid.envelope().unwrap();
    assert_eq!(invalid.status, 400);
    assert_eq!(envelope.code, "VALIDATION_ERROR");
    assert_eq!(
        envelope.message,
        "\"age\" must be between 0 and 150; \"username\" must be 3 to 32 characters"
    );
}

#[tokio::test]
async fn missing_permission_is_forbidden_without_side_effects() {
    let accounts = Accounts::new();
    let victim = accounts.register("victim").await;
    let (_, token) = accounts.signed_in("mallory", None).await;
    let writes = accounts.store().writes();

    let response = accounts
        .send(bearer(delete(&format!("/users/{victim}")), &token))
        .await;

    assert_eq!(response.status, 403);
    let envelope = response.envelope().unwrap();
    assert_eq!(envelope.message, "Permission denied.");
    assert_eq!(envelope.code, "AUTHENTICATION_ERROR");
    assert_eq!(accounts.store().writes(), writes);
    assert!(accounts.store().find(victim).unwrap().is_some());
}

#[tokio::test]
async fn privileged_role_bypasses_permission_checks() {
    let accounts = Accounts::new();
    let victim = accounts.register("victim").await;
    let (_, token) = accounts.signed_in("root", Some("ADMIN")).await;

    let response = accounts
        .send(bearer(delete(&format!("/users/{victim}")), &token))
        .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body["username"], "victim");
    assert!(accounts.store().find(victim).unwrap().is_none());
}

#[tokio::test]
async fn granted_permission_takes_effect() {
    let accounts = Accounts::new();
    let victim = accounts.register("victim").await;
    let (_, admin) = accounts.signed_in("root", Some("ADMIN")).await;
    let (_, user) = accounts.signed_in("mallory", None).await;

    let grant = accounts
        .send(bearer(
            post("/roles/USER/permissions", &json!({ "permission": "user:delete" })),
            &admin,
        ))
        .await;
    assert_eq!(grant.status, 201);
    assert_eq!(grant.body, json!(["user:delete", "user:read"]));

    let response = accounts
        .send(bearer(delete(&format!("/users/{victim}")), &user))
        .await;
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn cached_profile_is_read_once() {
    let accounts = Accounts::new();
    let (id, token) = accounts.signed_in("alice", None).await;
    let reads = accounts.store().reads();

    let first = accounts
        .send(bearer(get(&format!("/users/{id}")), &token))
        .await;
    let second = accounts
        .send(bearer(get(&format!("/users/{id}")), &token))
        .await;

    assert_eq!(first.status, 200);
    assert_eq!(first.body, second.body);
    assert_eq!(first.body["username"], "alice");
    assert_eq!(accounts.store().reads() - reads, 1);
}

#[tokio::test]
async fn update_evicts_cached_profile() {
    let accounts = Accounts::new();
    let id = accounts.register("alice").await;
    let (_, admin) = accounts.signed_in("root", Some("ADMIN")).await;

    let before = accounts
        .send(bearer(get(&format!("/users/{id}")), &admin))
        .await;
    assert_eq!(before.body["nickname"], json!(null));

    let updated = accounts
        .send(bearer(
            put(&format!("/users/{id}"), &json!({ "nickname": "Al" })),
            &admin,
        ))
        .await;
    assert_eq!(updated.status, 200);

    let after = accounts
        .send(bearer(get(&format!("/users/{id}")), &admin))
        .await;
    assert_eq!(after.body["nickname"], "Al");
}

#[tokio::test]
async fn expired_token_is_rejected_before_binding() {
    let accounts = Accounts::new();
    let (id, _) = accounts.signed_in("alice", Some("ADMIN")).await;
    let expired = accounts
        .jwt()
        .sign_claims(&Claims {
            user_id: Some(id.to_string()),
            iat: 1_000,
            exp: 2_000,
        })
        .unwrap();
    let writes = accounts.store().writes();

    let response = accounts
        .send(bearer(
            put(&format!("/users/{id}"), &json!({ "age": "not a number" })),
            &expired,
        ))
        .await;

    assert_eq!(response.status, 401);
    assert_eq!(response.envelope().unwrap().code, "AUTHORIZATION_ERROR");
    assert_eq!(accounts.store().writes(), writes);
}

#[tokio::test]
async fn logout_closes_the_session() {
    let accounts = Accounts::new();
    let (id, token) = accounts.signed_in("alice", None).await;

    let me = accounts.send(bearer(get("/users/me"), &token)).await;
    assert_eq!(me.body["id"], json!(id));

    let logout = accounts
        .send(bearer(put("/users/logout", &json!({})), &token))
        .await;
    assert_eq!(logout.body, json!({ "loggedOut": true }));

    let again = accounts.send(bearer(get("/users/me"), &token)).await;
    assert_eq!(again.status, 401);
    assert_eq!(again.envelope().unwrap().message, "Please login first.");
}

#[tokio::test]
async fn listing_filters_pages_and_validates_query() {
    let accounts = Accounts::new();
    accounts.register("anna").await;
    accounts.register("annie").await;
    let (_, token) = accounts.signed_in("bob", None).await;

    let page = accounts
        .send(bearer(
            get("/users")
                .with_query("username", "ann")
                .with_query("page", "2")
                .with_query("pageSize", "1"),
            &token,
        ))
        .await;
    assert_eq!(page.status, 200);
    assert_eq!(page.body.as_array().map(Vec::len), Some(1));
    assert_eq!(page.body[0]["username"], "annie");

    let invalid = accounts
        .send(bearer(get("/users").with_query("pageSize", "abc"), &token))
        .await;
    assert_eq!(invalid.status, 400);
    assert_eq!(
        invalid.envelope().unwrap().message,
        "\"pageSize\" must be a number"
    );
}

#[tokio::test]
async fn caller_sees_own_roles_and_permissions() {
    let accounts = Accounts::new();
    let (id, token) = accounts.signed_in("alice", None).await;

    let response = accounts.send(bearer(get("/permissions/me"), &token)).await;

    assert_eq!(
        response.body,
        json!({
            "userId": id.to_string(),
            "roles": ["USER"],
            "permissions": ["user:read"],
        })
    );
}

#[tokio::test]
async fn deactivated_accounts_are_purged() {
    let accounts = Accounts::new();
    let (id, token) = accounts.signed_in("alice", None).await;
    let (_, admin) = accounts.signed_in("root", Some("ADMIN")).await;

    let response = accounts
        .send(bearer(
            put(&format!("/users/{id}"), &json!({ "active": "false" })),
            &admin,
        ))
        .await;
    assert_eq!(response.body["active"], json!(false));

    let locked_out = accounts.send(bearer(get("/users/me"), &token)).await;
    assert_eq!(locked_out.status, 401);

    let users = accounts.app.container().get::<UserService>().unwrap();
    assert_eq!(users.purge_inactive().await.unwrap(), 1);
    assert!(accounts.store().find(id).unwrap().is_none());
}

#[tokio::test]
async fn ping_needs_no_token() {
    let accounts = Accounts::new();
    let response = accounts.send(get("/ping")).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body["pong"], json!(true));
}
