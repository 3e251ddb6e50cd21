// Common test utilities and helpers for all test modules
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use content_vault::api::{create_router, AppState};
use content_vault::config::Config;
use content_vault::core::password::CredentialHasher;
use content_vault::store::memory::MemoryStore;
use content_vault::store::{ContentRepository, UserRepository};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Lowest bcrypt cost accepted by the bcrypt crate
pub const TEST_HASH_COST: u32 = 4;

pub const TEST_PASSWORD: &str = "password1";

/// App state over a fresh in-memory store with a cheap hasher
pub fn create_test_app_state() -> AppState {
    let store = Arc::new(MemoryStore::new());
    let users: Arc<dyn UserRepository> = store.clone();
    let content: Arc<dyn ContentRepository> = store;
    AppState::new(
        Config::test_config(),
        users,
        content,
        CredentialHasher::with_cost(TEST_HASH_COST),
    )
    .unwrap()
}

pub fn create_test_router() -> (Router, AppState) {
    let state = create_test_app_state();
    (create_router(state.clone()), state)
}

/// Build a request with an optional JSON body and Authorization header
pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send one request through the router and decode the JSON body
///
/// Non-JSON bodies decode to `Value::Null`.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub async fn signup(router: &Router, username: &str) -> (StatusCode, Value) {
    send(
        router,
        request(
            Method::POST,
            "/api/v1/signup",
            None,
            Some(json!({
                "username": username,
                "password": TEST_PASSWORD,
                "email": format!("{}@example.com", username),
            })),
        ),
    )
    .await
}

pub async fn signin(router: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        router,
        request(
            Method::POST,
            "/api/v1/signin",
            None,
            Some(json!({ "username": username, "password": password })),
        ),
    )
    .await
}

/// Register `username` and return a fresh token for it
pub async fn register_and_login(router: &Router, username: &str) -> String {
    let (status, _) = signup(router, username).await;
    assert_eq!(status, StatusCode::OK, "signup failed for {}", username);

    let (status, body) = signin(router, username, TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::OK, "signin failed for {}", username);
    body["token"].as_str().unwrap().to_string()
}

/// Create a content record and return its id
pub async fn create_content(router: &Router, token: &str, title: &str) -> String {
    let (status, body) = send(
        router,
        request(
            Method::POST,
            "/api/v1/content",
            Some(token),
            Some(json!({ "title": title, "link": "https://example.com", "tags": ["t"] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["content"]["id"].as_str().unwrap().to_string()
}
