//! JWT access-token issuance and validation.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use critiq_domain::user::UserRole;

/// Access-token lifetime in seconds.
pub const ACCESS_TOKEN_TTL_SECS: u64 = 60 * 60 * 24;

/// Caller identity extracted from a validated access token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub user_id: Uuid,
    pub role: UserRole,
    pub is_superuser: bool,
    pub exp: u64,
}

/// Errors returned by token validation.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user ID (UUID string) |
/// | `role` | custom | role as snake_case string |
/// | `su` | custom | superuser flag |
/// | `exp` | `exp` | expiration, seconds since epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub role: UserRole,
    #[serde(default)]
    pub su: bool,
    pub exp: u64,
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Sign an access token for the given user.
pub fn issue_access_token(
    user_id: Uuid,
    role: UserRole,
    is_superuser: bool,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = JwtClaims {
        sub: user_id.to_string(),
        role,
        su: is_superuser,
        exp: unix_now() + ACCESS_TOKEN_TTL_SECS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and validate a JWT, returning raw claims.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway of 60s tolerates clock skew between replicas.
fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
        | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_) => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

/// Validate a bearer token value, returning parsed identity.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let claims = decode_jwt(token, secret)?;
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)?;
    Ok(TokenInfo {
        user_id,
        role: claims.role,
        is_superuser: claims.su,
        exp: claims.exp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

    #[test]
    fn should_round_trip_issued_token() {
        let user_id = Uuid::new_v4();
        let token =
            issue_access_token(user_id, UserRole::Moderator, false, TEST_SECRET).unwrap();

        let info = validate_access_token(&token, TEST_SECRET).unwrap();
        assert_eq!(info.user_id, user_id);
        assert_eq!(info.role, UserRole::Moderator);
        assert!(!info.is_superuser);
    }

    #[test]
    fn should_carry_superuser_flag_through_claims() {
        let user_id = Uuid::new_v4();
        let token = issue_access_token(user_id, UserRole::User, true, TEST_SECRET).unwrap();

        let info = validate_access_token(&token, TEST_SECRET).unwrap();
        assert!(info.is_superuser);
    }

    #[test]
    fn should_reject_expired_token() {
        let claims = JwtClaims {
            sub: Uuid::new_v4().to_string(),
            role: UserRole::User,
            su: false,
            // far in the past, beyond the 60s leeway
            exp: 1_000_000,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let err = validate_access_token(&token, TEST_SECRET).unwrap_err();
        assert!(matches!(err, AuthError::Expired));
    }

    #[test]
    fn should_reject_wrong_secret() {
        let token =
            issue_access_token(Uuid::new_v4(), UserRole::User, false, TEST_SECRET).unwrap();

        let err = validate_access_token(&token, "wrong-secret").unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn should_reject_malformed_token() {
        let err = validate_access_token("not-a-jwt", TEST_SECRET).unwrap_err();
        assert!(matches!(err, AuthError::Malformed));
    }

    #[test]
    fn should_reject_non_uuid_subject() {
        let claims = JwtClaims {
            sub: "alice".to_owned(),
            role: UserRole::User,
            su: false,
            exp: unix_now() + 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let err = validate_access_token(&token, TEST_SECRET).unwrap_err();
        assert!(matches!(err, AuthError::Malformed));
    }
}
