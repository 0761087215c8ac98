use axum::http::StatusCode;
use serde_json::json;

use critiq_domain::user::UserRole;

use crate::helpers::{TEST_JWT_SECRET, bearer, test_server};

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_serve_healthz_without_auth() {
    let server = test_server();

    let response = server.get("/healthz").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

// ── Bearer extraction ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_protected_route_without_bearer() {
    let server = test_server();

    let response = server.get("/users/@me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_garbage_bearer_token() {
    let server = test_server();

    let response = server
        .get("/users")
        .authorization_bearer("not-a-jwt")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_token_signed_with_other_secret() {
    let server = test_server();
    let token = critiq_auth_types::token::issue_access_token(
        uuid::Uuid::new_v4(),
        UserRole::Admin,
        false,
        "other-secret",
    )
    .unwrap();
    assert_ne!(TEST_JWT_SECRET, "other-secret");

    let response = server.get("/users").authorization_bearer(&token).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_require_auth_for_review_creation() {
    let server = test_server();

    let response = server
        .post("/titles/1/reviews")
        .json(&json!({ "text": "great", "score": 8 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// ── Administer gate ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_forbid_user_listing_for_regular_user() {
    let server = test_server();
    let token = bearer(UserRole::User, false);

    let response = server.get("/users").authorization_bearer(&token).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_forbid_user_listing_for_moderator() {
    let server = test_server();
    let token = bearer(UserRole::Moderator, false);

    let response = server.get("/users").authorization_bearer(&token).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_forbid_user_creation_without_administer() {
    let server = test_server();
    let token = bearer(UserRole::User, false);

    let response = server
        .post("/users")
        .authorization_bearer(&token)
        .json(&json!({ "username": "newbie", "email": "newbie@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_forbid_user_deletion_for_regular_user() {
    let server = test_server();
    let token = bearer(UserRole::User, false);

    let response = server
        .delete("/users/somebody")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_forbid_category_creation_for_regular_user() {
    let server = test_server();
    let token = bearer(UserRole::User, false);

    let response = server
        .post("/categories")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Films", "slug": "films" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_forbid_genre_deletion_for_moderator() {
    let server = test_server();
    let token = bearer(UserRole::Moderator, false);

    let response = server
        .delete("/genres/action")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_forbid_title_creation_for_regular_user() {
    let server = test_server();
    let token = bearer(UserRole::User, false);

    let response = server
        .post("/titles")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Some Film", "year": 1999 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_forbid_title_update_for_moderator() {
    let server = test_server();
    let token = bearer(UserRole::Moderator, false);

    let response = server
        .patch("/titles/1")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Renamed" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_forbid_title_deletion_for_moderator() {
    let server = test_server();
    let token = bearer(UserRole::Moderator, false);

    let response = server
        .delete("/titles/1")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}
