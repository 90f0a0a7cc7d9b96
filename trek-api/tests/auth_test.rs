mod common;

use std::sync::Arc;

use serde_json::json;
use trek_core::identity::Role;

use common::*;

#[tokio::test]
async fn register_issues_a_usable_token() {
    let backend = Arc::new(MemBackend::default());
    let state = test_state(&backend);

    let (status, body) = send(
        trek_api::app(state.clone()),
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({ "username": "newcomer", "phone": "9800000009" })),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["profile"]["role"], "user");
    let token = format!("Bearer {}", body["token"].as_str().unwrap());

    // The issued token opens the session-gated routes.
    let (status, mine) = send(
        trek_api::app(state),
        "GET",
        "/v1/bookings/mine",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(mine.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn login_finds_the_existing_profile() {
    let backend = Arc::new(MemBackend::default());
    let profile = seed_profile(&backend, "returning", Role::User);

    let (status, body) = send(
        trek_api::app(test_state(&backend)),
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "username": "returning" })),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["profile"]["id"], profile.id.to_string());
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn login_with_unknown_username_is_401() {
    let backend = Arc::new(MemBackend::default());

    let (status, body) = send(
        trek_api::app(test_state(&backend)),
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "username": "nobody" })),
    )
    .await;

    assert_eq!(status, 401);
    assert_eq!(body["error"], "unknown username");
}

#[tokio::test]
async fn garbage_bearer_token_is_rejected() {
    let backend = Arc::new(MemBackend::default());

    let (status, _) = send(
        trek_api::app(test_state(&backend)),
        "GET",
        "/v1/bookings/mine",
        Some("Bearer not-a-jwt"),
        None,
    )
    .await;

    assert_eq!(status, 401);
}
