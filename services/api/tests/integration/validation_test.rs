use axum::http::StatusCode;
use serde_json::{Value, json};

use critiq_domain::user::UserRole;

use crate::helpers::{bearer, test_server};

fn error_kind(response: &axum_test::TestResponse) -> String {
    let body: Value = response.json();
    body["kind"].as_str().unwrap_or_default().to_owned()
}

// ── Signup ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_signup_with_reserved_username() {
    let server = test_server();

    let response = server
        .post("/auth/signup")
        .json(&json!({ "username": "me", "email": "me@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&response), "INVALID_USERNAME");
}

#[tokio::test]
async fn should_reject_signup_with_invalid_email() {
    let server = test_server();

    let response = server
        .post("/auth/signup")
        .json(&json!({ "username": "alice", "email": "not-an-email" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&response), "INVALID_EMAIL");
}

// ── Reviews ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_review_with_score_below_range() {
    let server = test_server();
    let token = bearer(UserRole::User, false);

    let response = server
        .post("/titles/1/reviews")
        .authorization_bearer(&token)
        .json(&json!({ "text": "meh", "score": 0 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&response), "INVALID_SCORE");
}

#[tokio::test]
async fn should_reject_review_with_score_above_range() {
    let server = test_server();
    let token = bearer(UserRole::User, false);

    let response = server
        .post("/titles/1/reviews")
        .authorization_bearer(&token)
        .json(&json!({ "text": "masterpiece", "score": 11 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&response), "INVALID_SCORE");
}

#[tokio::test]
async fn should_reject_review_with_empty_text() {
    let server = test_server();
    let token = bearer(UserRole::User, false);

    let response = server
        .post("/titles/1/reviews")
        .authorization_bearer(&token)
        .json(&json!({ "text": "", "score": 5 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&response), "MISSING_DATA");
}

// ── Titles ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_title_with_future_year() {
    let server = test_server();
    let token = bearer(UserRole::Admin, false);

    let response = server
        .post("/titles")
        .authorization_bearer(&token)
        .json(&json!({ "name": "From The Future", "year": 3000 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&response), "INVALID_YEAR");
}

#[tokio::test]
async fn should_reject_title_with_empty_name() {
    let server = test_server();
    let token = bearer(UserRole::Admin, false);

    let response = server
        .post("/titles")
        .authorization_bearer(&token)
        .json(&json!({ "name": "", "year": 1999 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&response), "MISSING_DATA");
}

// ── Categories ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_category_with_invalid_slug() {
    let server = test_server();
    let token = bearer(UserRole::Admin, false);

    let response = server
        .post("/categories")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Films", "slug": "Not A Slug!" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&response), "INVALID_SLUG");
}

// ── Superuser flag ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_grant_administer_to_superuser_regardless_of_role() {
    let server = test_server();
    let token = bearer(UserRole::User, true);

    // Past the administer gate, rejected by input validation instead.
    let response = server
        .post("/titles")
        .authorization_bearer(&token)
        .json(&json!({ "name": "From The Future", "year": 3000 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&response), "INVALID_YEAR");
}
