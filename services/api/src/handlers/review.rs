use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use critiq_auth_types::identity::Identity;
use critiq_domain::pagination::PageRequest;

use crate::domain::types::Review;
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::review::{
    CreateReviewInput, CreateReviewUseCase, DeleteReviewUseCase, GetReviewUseCase,
    ListReviewsUseCase, UpdateReviewInput, UpdateReviewUseCase,
};

#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: i32,
    pub author: String,
    pub text: String,
    pub score: i16,
    #[serde(serialize_with = "critiq_core::serde::to_rfc3339_ms")]
    pub pub_date: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            author: review.author_username,
            text: review.text,
            score: review.score,
            pub_date: review.pub_date,
        }
    }
}

// ── GET /titles/{title_id}/reviews ───────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReviewListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn get_reviews(
    State(state): State<AppState>,
    Path(title_id): Path<i32>,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<Vec<ReviewResponse>>, ApiServiceError> {
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    }
    .clamped();
    let usecase = ListReviewsUseCase {
        reviews: state.review_repo(),
        titles: state.title_repo(),
    };
    let reviews = usecase.execute(title_id, page).await?;
    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}

// ── POST /titles/{title_id}/reviews ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub text: String,
    pub score: i16,
}

pub async fn create_review(
    identity: Identity,
    State(state): State<AppState>,
    Path(title_id): Path<i32>,
    Json(body): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiServiceError> {
    let usecase = CreateReviewUseCase {
        reviews: state.review_repo(),
        titles: state.title_repo(),
    };
    let review = usecase
        .execute(CreateReviewInput {
            title_id,
            author_id: identity.user_id,
            text: body.text,
            score: body.score,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(review.into())))
}

// ── GET /titles/{title_id}/reviews/{review_id} ───────────────────────────────

pub async fn get_review(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i32, i32)>,
) -> Result<Json<ReviewResponse>, ApiServiceError> {
    let usecase = GetReviewUseCase {
        reviews: state.review_repo(),
        titles: state.title_repo(),
    };
    let review = usecase.execute(title_id, review_id).await?;
    Ok(Json(review.into()))
}

// ── PATCH /titles/{title_id}/reviews/{review_id} ─────────────────────────────

#[derive(Deserialize)]
pub struct UpdateReviewRequest {
    pub text: Option<String>,
    pub score: Option<i16>,
}

pub async fn update_review(
    identity: Identity,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i32, i32)>,
    Json(body): Json<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiServiceError> {
    let usecase = UpdateReviewUseCase {
        reviews: state.review_repo(),
        titles: state.title_repo(),
    };
    let review = usecase
        .execute(
            title_id,
            review_id,
            identity.user_id,
            identity.caps,
            UpdateReviewInput {
                text: body.text,
                score: body.score,
            },
        )
        .await?;
    Ok(Json(review.into()))
}

// ── DELETE /titles/{title_id}/reviews/{review_id} ────────────────────────────

pub async fn delete_review(
    identity: Identity,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = DeleteReviewUseCase {
        reviews: state.review_repo(),
        titles: state.title_repo(),
    };
    usecase
        .execute(title_id, review_id, identity.user_id, identity.caps)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
