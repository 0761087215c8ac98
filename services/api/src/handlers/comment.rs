use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use critiq_auth_types::identity::Identity;
use critiq_domain::pagination::PageRequest;

use crate::domain::types::Comment;
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::comment::{
    CreateCommentInput, CreateCommentUseCase, DeleteCommentUseCase, GetCommentUseCase,
    ListCommentsUseCase, UpdateCommentUseCase,
};

#[derive(Serialize)]
pub struct CommentResponse {
    pub id: i32,
    pub author: String,
    pub text: String,
    #[serde(serialize_with = "critiq_core::serde::to_rfc3339_ms")]
    pub pub_date: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            author: comment.author_username,
            text: comment.text,
            pub_date: comment.pub_date,
        }
    }
}

// ── GET /titles/{title_id}/reviews/{review_id}/comments ──────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommentListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn get_comments(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i32, i32)>,
    Query(query): Query<CommentListQuery>,
) -> Result<Json<Vec<CommentResponse>>, ApiServiceError> {
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    }
    .clamped();
    let usecase = ListCommentsUseCase {
        comments: state.comment_repo(),
        reviews: state.review_repo(),
    };
    let comments = usecase.execute(title_id, review_id, page).await?;
    Ok(Json(
        comments.into_iter().map(CommentResponse::from).collect(),
    ))
}

// ── POST /titles/{title_id}/reviews/{review_id}/comments ─────────────────────

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

pub async fn create_comment(
    identity: Identity,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i32, i32)>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiServiceError> {
    let usecase = CreateCommentUseCase {
        comments: state.comment_repo(),
        reviews: state.review_repo(),
    };
    let comment = usecase
        .execute(CreateCommentInput {
            title_id,
            review_id,
            author_id: identity.user_id,
            text: body.text,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

// ── GET /titles/{title_id}/reviews/{review_id}/comments/{comment_id} ─────────

pub async fn get_comment(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(i32, i32, i32)>,
) -> Result<Json<CommentResponse>, ApiServiceError> {
    let usecase = GetCommentUseCase {
        comments: state.comment_repo(),
        reviews: state.review_repo(),
    };
    let comment = usecase.execute(title_id, review_id, comment_id).await?;
    Ok(Json(comment.into()))
}

// ── PATCH /titles/{title_id}/reviews/{review_id}/comments/{comment_id} ───────

#[derive(Deserialize)]
pub struct UpdateCommentRequest {
    pub text: String,
}

pub async fn update_comment(
    identity: Identity,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(i32, i32, i32)>,
    Json(body): Json<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, ApiServiceError> {
    let usecase = UpdateCommentUseCase {
        comments: state.comment_repo(),
        reviews: state.review_repo(),
    };
    let comment = usecase
        .execute(
            title_id,
            review_id,
            comment_id,
            identity.user_id,
            identity.caps,
            body.text,
        )
        .await?;
    Ok(Json(comment.into()))
}

// ── DELETE /titles/{title_id}/reviews/{review_id}/comments/{comment_id} ──────

pub async fn delete_comment(
    identity: Identity,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(i32, i32, i32)>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = DeleteCommentUseCase {
        comments: state.comment_repo(),
        reviews: state.review_repo(),
    };
    usecase
        .execute(title_id, review_id, comment_id, identity.user_id, identity.caps)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
