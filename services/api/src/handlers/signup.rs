use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::signup::{SignUpInput, SignUpUseCase};

// ── POST /auth/signup ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
}

/// Open endpoint: no identity required. Re-signup with the same pair is
/// idempotent and rotates the confirmation code.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = SignUpUseCase {
        repo: state.user_repo(),
    };
    usecase
        .execute(SignUpInput {
            username: body.username,
            email: body.email,
        })
        .await?;
    Ok(StatusCode::OK)
}
