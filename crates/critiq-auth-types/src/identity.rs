//! Bearer-token identity extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use critiq_domain::capability::Capabilities;
use critiq_domain::user::UserRole;

use crate::token::validate_access_token;

/// JWT signing secret, exposed to the extractor via `FromRef` on app state.
#[derive(Debug, Clone)]
pub struct JwtSecret(pub String);

/// Authenticated caller, extracted from the `Authorization: Bearer` header.
///
/// Returns 401 if the header is absent, malformed, or the token fails
/// validation. Capabilities are resolved once here; handlers and usecases
/// consume them without re-checking roles.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: UserRole,
    pub is_superuser: bool,
    pub caps: Capabilities,
}

impl Identity {
    pub fn new(user_id: Uuid, role: UserRole, is_superuser: bool) -> Self {
        Self {
            user_id,
            role,
            is_superuser,
            caps: Capabilities::resolve(role, is_superuser),
        }
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let bearer = parts.headers.typed_get::<Authorization<Bearer>>();

        async move {
            let bearer = bearer.ok_or(StatusCode::UNAUTHORIZED)?;
            let info = validate_access_token(bearer.token(), &secret.0)
                .map_err(|_| StatusCode::UNAUTHORIZED)?;
            Ok(Self::new(info.user_id, info.role, info.is_superuser))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use http::Request;

    use crate::token::issue_access_token;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

    #[derive(Clone)]
    struct TestState {
        secret: JwtSecret,
    }

    impl FromRef<TestState> for JwtSecret {
        fn from_ref(state: &TestState) -> Self {
            state.secret.clone()
        }
    }

    fn test_state() -> TestState {
        TestState {
            secret: JwtSecret(TEST_SECRET.to_owned()),
        }
    }

    async fn extract_identity(auth_header: Option<&str>) -> Result<Identity, StatusCode> {
        let mut builder = Request::builder().method("PATCH").uri("/test");
        if let Some(value) = auth_header {
            builder = builder.header("authorization", value);
        }
        let request = builder.body(()).unwrap();
        let (mut parts, _body) = request.into_parts();
        Identity::from_request_parts(&mut parts, &test_state()).await
    }

    #[tokio::test]
    async fn should_extract_identity_from_valid_bearer_token() {
        let user_id = Uuid::new_v4();
        let token = issue_access_token(user_id, UserRole::Moderator, false, TEST_SECRET).unwrap();

        let identity = extract_identity(Some(&format!("Bearer {token}"))).await.unwrap();
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.role, UserRole::Moderator);
        assert!(identity.caps.write_any);
        assert!(!identity.caps.administer);
    }

    #[tokio::test]
    async fn should_resolve_administer_for_superuser() {
        let token = issue_access_token(Uuid::new_v4(), UserRole::User, true, TEST_SECRET).unwrap();

        let identity = extract_identity(Some(&format!("Bearer {token}"))).await.unwrap();
        assert!(identity.is_superuser);
        assert!(identity.caps.administer);
    }

    #[tokio::test]
    async fn should_reject_missing_authorization_header() {
        let result = extract_identity(None).await;
        assert_eq!(result.unwrap_err(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_reject_non_bearer_scheme() {
        let result = extract_identity(Some("Basic dXNlcjpwYXNz")).await;
        assert_eq!(result.unwrap_err(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_reject_garbage_token() {
        let result = extract_identity(Some("Bearer not-a-jwt")).await;
        assert_eq!(result.unwrap_err(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_reject_token_signed_with_other_secret() {
        let token =
            issue_access_token(Uuid::new_v4(), UserRole::Admin, false, "other-secret").unwrap();

        let result = extract_identity(Some(&format!("Bearer {token}"))).await;
        assert_eq!(result.unwrap_err(), StatusCode::UNAUTHORIZED);
    }
}
