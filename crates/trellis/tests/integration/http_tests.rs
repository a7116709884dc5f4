//! Account endpoints over HTTP

use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::Value;
use trellis::server::ErrorEnvelope;

use crate::test_utils::{Accounts, PASSWORD};

#[tokio::test]
async fn register_login_and_read_profile() {
    let accounts = Accounts::new();
    let client = Client::tracked(accounts.app.rocket()).await.unwrap();

    let registered = client
        .post("/users/register")
        .header(ContentType::JSON)
        .body(format!(
            r#"{{"username":"alice","password":"{PASSWORD}","confirmedPassword":"{PASSWORD}"}}"#
        ))
        .dispatch()
        .await;
    assert_eq!(registered.status(), Status::Created);
    let id = registered.into_json::<Value>().await.unwrap()["id"]
        .as_u64()
        .unwrap();

    let login = client
        .put("/users/login")
        .header(ContentType::JSON)
        .body(format!(r#"{{"username":"alice","password":"{PASSWORD}"}}"#))
        .dispatch()
        .await;
    assert_eq!(login.status(), Status::Ok);
    let token = login.into_json::<Value>().await.unwrap()["token"]
        .as_str()
        .unwrap()
        .to_string();

    let profile = client
        .get(format!("/users/{id}"))
        .header(Header::new("Authorization", format!("Bearer {token}")))
        .dispatch()
        .await;
    assert_eq!(profile.status(), Status::Ok);
    assert_eq!(profile.into_json::<Value>().await.unwrap()["username"], "alice");
}

#[tokio::test]
async fn missing_header_is_reported_in_the_envelope() {
    let accounts = Accounts::new();
    let client = Client::tracked(accounts.app.rocket()).await.unwrap();

    let response = client.get("/users/me").dispatch().await;

    assert_eq!(response.status(), Status::Unauthorized);
    let request_id = response
        .headers()
        .get_one("x-request-id")
        .map(str::to_string)
        .unwrap();
    let envelope = response.into_json::<ErrorEnvelope>().await.unwrap();
    assert_eq!(envelope.message, "The header `authorization` is not found.");
    assert_eq!(envelope.request_id, request_id);
}
