use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

/// Readiness check including database connectivity.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
