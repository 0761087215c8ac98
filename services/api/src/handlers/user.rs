use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use critiq_auth_types::identity::Identity;
use critiq_domain::pagination::PageRequest;
use critiq_domain::user::UserRole;

use crate::domain::types::User;
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::user::{
    CreateUserInput, CreateUserUseCase, DeleteUserUseCase, GetMeUseCase, GetUserUseCase,
    ListUsersUseCase, UpdateMeUseCase, UpdateUserInput, UpdateUserUseCase,
};

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: UserRole,
    #[serde(serialize_with = "critiq_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "critiq_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── GET /users ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserListQuery {
    pub search: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn get_users(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiServiceError> {
    if !identity.caps.administer {
        return Err(ApiServiceError::Forbidden);
    }
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    }
    .clamped();
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let users = usecase.execute(query.search, page).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<UserRole>,
}

pub async fn create_user(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiServiceError> {
    if !identity.caps.administer {
        return Err(ApiServiceError::Forbidden);
    }
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(CreateUserInput {
            username: body.username,
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            bio: body.bio,
            role: body.role.unwrap_or_default(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiServiceError> {
    let usecase = GetMeUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/@me ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<UserRole>,
}

pub async fn update_me(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiServiceError> {
    // Role changes through @me require administer.
    let role = if identity.caps.administer {
        body.role
    } else {
        None
    };
    let usecase = UpdateMeUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            identity.user_id,
            UpdateUserInput {
                username: body.username,
                email: body.email,
                first_name: body.first_name,
                last_name: body.last_name,
                bio: body.bio,
                role,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── GET /users/{username} ────────────────────────────────────────────────────

pub async fn get_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiServiceError> {
    if !identity.caps.administer {
        return Err(ApiServiceError::Forbidden);
    }
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&username).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/{username} ──────────────────────────────────────────────────

pub async fn update_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiServiceError> {
    if !identity.caps.administer {
        return Err(ApiServiceError::Forbidden);
    }
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            &username,
            UpdateUserInput {
                username: body.username,
                email: body.email,
                first_name: body.first_name,
                last_name: body.last_name,
                bio: body.bio,
                role: body.role,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── DELETE /users/{username} ─────────────────────────────────────────────────

pub async fn delete_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiServiceError> {
    if !identity.caps.administer {
        return Err(ApiServiceError::Forbidden);
    }
    let usecase = DeleteUserUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(&username).await?;
    Ok(StatusCode::NO_CONTENT)
}
