//! Requests through the Rocket transport

use std::sync::Arc;

use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::{Value, json};
use trellis_infrastructure::config::ConfigBuilder;
use trellis_infrastructure::di::ComponentRegistry;
use trellis_providers::InMemoryPermissionProvider;
use trellis_server::{Application, ErrorEnvelope};

use crate::test_utils::NoteController;

async fn client() -> Client {
    let registry = ComponentRegistry::new()
        .register::<NoteController>()
        .unwrap();
    let app = Application::builder()
        .with_config(ConfigBuilder::new().build())
        .with_registry(registry)
        .with_permission_provider(Arc::new(InMemoryPermissionProvider::new()))
        .with_logging(false)
        .build()
        .unwrap();
    Client::tracked(app.rocket()).await.unwrap()
}

#[tokio::test]
async fn routed_request_returns_handler_output() {
    let client = client().await;
    let response = client.get("/notes/ping").dispatch().await;

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.content_type(), Some(ContentType::JSON));
    assert_eq!(
        response.headers().get_one("x-request-id").map(str::len),
        Some(7)
    );
    assert_eq!(response.into_json::<Value>().await, Some(json!("pong")));
}

#[tokio::test]
async fn path_captures_reach_the_handler() {
    let client = client().await;
    let response = client.get("/notes/abc").dispatch().await;

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.into_json::<Value>().await, Some(json!({ "id": "abc" })));
}

#[tokio::test]
async fn unauthenticated_request_gets_the_error_envelope() {
    let client = client().await;
    let response = client
        .post("/notes")
        .header(ContentType::JSON)
        .body(r#"{"title":"x","priority":1}"#)
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Unauthorized);
    let envelope: ErrorEnvelope = response.into_json().await.unwrap();
    assert_eq!(envelope.message, "The header `authorization` is not found.");
    assert_eq!(envelope.request_id.len(), 7);
}

#[tokio::test]
async fn unmatched_request_is_a_json_not_found() {
    let client = client().await;
    let response = client.get("/missing/route").dispatch().await;

    assert_eq!(response.status(), Status::NotFound);
    let envelope: ErrorEnvelope = response.into_json().await.unwrap();
    assert_eq!(envelope.code, "NOT_FOUND");
}

#[tokio::test]
async fn cors_headers_are_attached() {
    let client = client().await;
    let response = client
        .get("/notes/ping")
        .header(Header::new("Origin", "https://app.example"))
        .dispatch()
        .await;

    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Origin"),
        Some("*")
    );

    let preflight = client
        .options("/notes")
        .header(Header::new("Origin", "https://app.example"))
        .dispatch()
        .await;
    assert_eq!(preflight.status(), Status::NoContent);
}
