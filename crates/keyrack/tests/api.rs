// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete vault API.
//!
//! Each test builds an isolated router over a temp SQLite database with a
//! low-cost KDF configuration and drives it in-process via tower. Tests are
//! independent and order-insensitive.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use keyrack_config::model::VaultConfig;
use keyrack_gateway::{GatewayState, build_router};
use keyrack_storage::Database;
use keyrack_vault::VaultService;
use serde_json::{Value, json};
use tower::ServiceExt;

const MASTER: &str = "Abcdef1!";

async fn test_router() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("api_test.db");
    let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
    let config = VaultConfig {
        kdf_iterations: 1_000,
        generated_password_length: 16,
    };
    let service = VaultService::new(db, &config).unwrap();
    let state = GatewayState {
        service: Arc::new(service),
    };
    (build_router(state), dir)
}

/// Send one request through the router and decode the JSON response body.
async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    master: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(master) = master {
        builder = builder.header("master-password", master);
    }
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn initialize(router: &Router) {
    let (status, body) = send(
        router,
        "POST",
        "/initialize/",
        None,
        Some(json!({"master_password": MASTER})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}

// ---- Status, enrollment, and verification ----

#[tokio::test]
async fn status_reports_initialization_lifecycle() {
    let (router, _dir) = test_router().await;

    let (status, body) = send(&router, "GET", "/status/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_initialized"], json!(false));

    initialize(&router).await;

    let (status, body) = send(&router, "GET", "/status/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_initialized"], json!(true));
}

#[tokio::test]
async fn second_initialize_returns_400() {
    let (router, _dir) = test_router().await;
    initialize(&router).await;

    let (status, _) = send(
        &router,
        "POST",
        "/initialize/",
        None,
        Some(json!({"master_password": "Another1!"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The first master password still verifies.
    let (status, _) = send(
        &router,
        "POST",
        "/verify/",
        None,
        Some(json!({"master_password": MASTER})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn weak_master_password_returns_422() {
    let (router, _dir) = test_router().await;

    for weak in ["short", "allLowercase", "NoSpecials1"] {
        let (status, _) = send(
            &router,
            "POST",
            "/initialize/",
            None,
            Some(json!({"master_password": weak})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{weak}");
    }
}

#[tokio::test]
async fn verify_maps_all_three_outcomes() {
    let (router, _dir) = test_router().await;

    // Not initialized yet.
    let (status, _) = send(
        &router,
        "POST",
        "/verify/",
        None,
        Some(json!({"master_password": MASTER})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    initialize(&router).await;

    let (status, _) = send(
        &router,
        "POST",
        "/verify/",
        None,
        Some(json!({"master_password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &router,
        "POST",
        "/verify/",
        None,
        Some(json!({"master_password": MASTER})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}

// ---- Credential creation and the duplicate policy ----

#[tokio::test]
async fn create_then_duplicate_yields_exists_with_matching_id() {
    let (router, _dir) = test_router().await;
    initialize(&router).await;

    let (status, body) = send(
        &router,
        "POST",
        "/credentials/",
        Some(MASTER),
        Some(json!({"app_name": "gmail", "username": "a@b.com", "created_by": "alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("created"));
    let id = body["id"].as_i64().unwrap();
    // Generated password is 16 characters, returned exactly once.
    assert_eq!(body["generated_password"].as_str().unwrap().len(), 16);

    // Different author, same (app, username) pair: still a duplicate.
    let (status, body) = send(
        &router,
        "POST",
        "/credentials/",
        Some(MASTER),
        Some(json!({"app_name": "gmail", "username": "a@b.com", "created_by": "bob"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("exists"));
    assert_eq!(body["existing_id"].as_i64().unwrap(), id);
    assert_eq!(body["app_name"], json!("Gmail"));
    assert_eq!(body["created_by"], json!("Alice"));
}

#[tokio::test]
async fn names_are_normalized_on_storage() {
    let (router, _dir) = test_router().await;
    initialize(&router).await;

    send(
        &router,
        "POST",
        "/credentials/",
        Some(MASTER),
        Some(json!({"app_name": "GITHUB", "username": "u", "created_by": "carol"})),
    )
    .await;

    let (status, body) = send(&router, "GET", "/apps/", Some(MASTER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["apps"], json!(["Github"]));
}

#[tokio::test]
async fn weak_explicit_credential_password_returns_422() {
    let (router, _dir) = test_router().await;
    initialize(&router).await;

    let (status, _) = send(
        &router,
        "POST",
        "/credentials/",
        Some(MASTER),
        Some(json!({
            "app_name": "gmail",
            "username": "u",
            "created_by": "x",
            "password": "short"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ---- Listing and decryption ----

#[tokio::test]
async fn generated_password_round_trips_through_listing() {
    let (router, _dir) = test_router().await;
    initialize(&router).await;

    let (_, body) = send(
        &router,
        "POST",
        "/credentials/",
        Some(MASTER),
        Some(json!({"app_name": "gmail", "username": "u", "created_by": "x"})),
    )
    .await;
    let generated = body["generated_password"].as_str().unwrap().to_string();

    let (status, body) = send(
        &router,
        "GET",
        "/credentials/?app_name=Gmail",
        Some(MASTER),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    // The wire field keeps the column name but carries the decrypted value.
    assert_eq!(items[0]["encrypted_password"].as_str().unwrap(), generated);
    assert_eq!(items[0]["app_name"], json!("Gmail"));
    assert_eq!(items[0]["username"], json!("u"));
    assert_eq!(items[0]["created_by"], json!("X"));
}

#[tokio::test]
async fn list_without_filter_returns_everything() {
    let (router, _dir) = test_router().await;
    initialize(&router).await;

    for (app, user) in [("gmail", "a"), ("aws", "b")] {
        send(
            &router,
            "POST",
            "/credentials/",
            Some(MASTER),
            Some(json!({"app_name": app, "username": user, "created_by": "x"})),
        )
        .await;
    }

    let (status, body) = send(&router, "GET", "/credentials/", Some(MASTER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn listing_requires_the_right_master_password() {
    let (router, _dir) = test_router().await;
    initialize(&router).await;

    let (status, _) = send(&router, "GET", "/credentials/", Some("wrong"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&router, "GET", "/credentials/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ---- Updates ----

#[tokio::test]
async fn update_replaces_the_password_and_nothing_else() {
    let (router, _dir) = test_router().await;
    initialize(&router).await;

    let (_, body) = send(
        &router,
        "POST",
        "/credentials/",
        Some(MASTER),
        Some(json!({
            "app_name": "gmail",
            "username": "u",
            "created_by": "x",
            "password": "OldPass,1"
        })),
    )
    .await;
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &router,
        "PUT",
        &format!("/credentials/{id}"),
        Some(MASTER),
        Some(json!({"password": "NewPass1!"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("updated"));
    assert_eq!(body["id"].as_i64().unwrap(), id);
    assert!(body.get("generated_password").is_none());

    let (_, body) = send(&router, "GET", "/credentials/", Some(MASTER), None).await;
    let items = body.as_array().unwrap();
    assert_eq!(items[0]["encrypted_password"], json!("NewPass1!"));
    assert_eq!(items[0]["username"], json!("u"));
    assert_eq!(items[0]["created_by"], json!("X"));
}

#[tokio::test]
async fn update_unknown_id_returns_404() {
    let (router, _dir) = test_router().await;
    initialize(&router).await;

    let (status, _) = send(
        &router,
        "PUT",
        "/credentials/999",
        Some(MASTER),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---- Deletion ----

#[tokio::test]
async fn delete_removes_the_credential() {
    let (router, _dir) = test_router().await;
    initialize(&router).await;

    let (_, body) = send(
        &router,
        "POST",
        "/credentials/",
        Some(MASTER),
        Some(json!({"app_name": "gmail", "username": "u", "created_by": "x"})),
    )
    .await;
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &router,
        "DELETE",
        &format!("/credentials/{id}"),
        Some(MASTER),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("deleted"));

    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/credentials/{id}"),
        Some(MASTER),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_guarded_like_every_other_operation() {
    let (router, _dir) = test_router().await;

    // Uninitialized vault: 404, not a crash.
    let (status, _) = send(&router, "DELETE", "/credentials/1", Some(MASTER), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    initialize(&router).await;

    let (status, _) = send(&router, "DELETE", "/credentials/1", Some("wrong"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ---- Apps listing ----

#[tokio::test]
async fn apps_endpoint_maps_auth_errors() {
    let (router, _dir) = test_router().await;

    let (status, _) = send(&router, "GET", "/apps/", Some(MASTER), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    initialize(&router).await;

    let (status, _) = send(&router, "GET", "/apps/", Some("wrong"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&router, "GET", "/apps/", Some(MASTER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["apps"], json!([]));
}
