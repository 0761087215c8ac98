use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use critiq_api::router::build_router;
use critiq_api::state::AppState;
use critiq_auth_types::token::issue_access_token;
use critiq_domain::user::UserRole;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-http-tests-only";

/// Test server over a disconnected database.
///
/// Exercises routing, extraction, capability gates, and input validation,
/// all of which reject before any query runs. Paths that reach the
/// database are covered by the repository-mock tests in each usecase.
pub fn test_server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::default(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    TestServer::new(build_router(state)).unwrap()
}

pub fn bearer(role: UserRole, is_superuser: bool) -> String {
    issue_access_token(Uuid::new_v4(), role, is_superuser, TEST_JWT_SECRET).unwrap()
}
