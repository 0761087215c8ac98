use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::token::{CreateTokenInput, CreateTokenUseCase};

// ── POST /auth/token ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTokenRequest {
    pub username: String,
    pub confirmation_code: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access: String,
}

pub async fn create_token(
    State(state): State<AppState>,
    Json(body): Json<CreateTokenRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiServiceError> {
    let usecase = CreateTokenUseCase {
        repo: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let output = usecase
        .execute(CreateTokenInput {
            username: body.username,
            confirmation_code: body.confirmation_code,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            access: output.access_token,
        }),
    ))
}
