use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use critiq_auth_types::identity::Identity;
use critiq_domain::pagination::PageRequest;

use crate::domain::types::{TitleDetail, TitleFilter};
use crate::error::ApiServiceError;
use crate::handlers::category::CategoryResponse;
use crate::handlers::genre::GenreResponse;
use crate::state::AppState;
use crate::usecase::title::{
    CreateTitleInput, CreateTitleUseCase, DeleteTitleUseCase, GetTitleUseCase, ListTitlesUseCase,
    UpdateTitleInput, UpdateTitleUseCase,
};

#[derive(Serialize)]
pub struct TitleResponse {
    pub id: i32,
    pub name: String,
    pub year: i16,
    /// Mean review score, absent while the title has no reviews.
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub genre: Vec<GenreResponse>,
    pub category: Option<CategoryResponse>,
}

impl From<TitleDetail> for TitleResponse {
    fn from(detail: TitleDetail) -> Self {
        Self {
            id: detail.title.id,
            name: detail.title.name,
            year: detail.title.year,
            rating: detail.rating,
            description: detail.title.description,
            genre: detail.genres.into_iter().map(GenreResponse::from).collect(),
            category: detail.category.map(CategoryResponse::from),
        }
    }
}

// ── GET /titles ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TitleListQuery {
    pub name: Option<String>,
    pub year: Option<i16>,
    pub genre: Option<String>,
    pub category: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn get_titles(
    State(state): State<AppState>,
    Query(query): Query<TitleListQuery>,
) -> Result<Json<Vec<TitleResponse>>, ApiServiceError> {
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    }
    .clamped();
    let filter = TitleFilter {
        name: query.name,
        year: query.year,
        genre: query.genre,
        category: query.category,
    };
    let usecase = ListTitlesUseCase {
        titles: state.title_repo(),
    };
    let titles = usecase.execute(filter, page).await?;
    Ok(Json(titles.into_iter().map(TitleResponse::from).collect()))
}

// ── POST /titles ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTitleRequest {
    pub name: String,
    pub year: i16,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
}

pub async fn create_title(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateTitleRequest>,
) -> Result<(StatusCode, Json<TitleResponse>), ApiServiceError> {
    if !identity.caps.administer {
        return Err(ApiServiceError::Forbidden);
    }
    let usecase = CreateTitleUseCase {
        titles: state.title_repo(),
        categories: state.category_repo(),
        genres: state.genre_repo(),
    };
    let detail = usecase
        .execute(CreateTitleInput {
            name: body.name,
            year: body.year,
            description: body.description,
            category: body.category,
            genres: body.genre,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}

// ── GET /titles/{title_id} ───────────────────────────────────────────────────

pub async fn get_title(
    State(state): State<AppState>,
    Path(title_id): Path<i32>,
) -> Result<Json<TitleResponse>, ApiServiceError> {
    let usecase = GetTitleUseCase {
        titles: state.title_repo(),
    };
    let detail = usecase.execute(title_id).await?;
    Ok(Json(detail.into()))
}

// ── PATCH /titles/{title_id} ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateTitleRequest {
    pub name: Option<String>,
    pub year: Option<i16>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

pub async fn update_title(
    identity: Identity,
    State(state): State<AppState>,
    Path(title_id): Path<i32>,
    Json(body): Json<UpdateTitleRequest>,
) -> Result<Json<TitleResponse>, ApiServiceError> {
    if !identity.caps.administer {
        return Err(ApiServiceError::Forbidden);
    }
    let usecase = UpdateTitleUseCase {
        titles: state.title_repo(),
        categories: state.category_repo(),
        genres: state.genre_repo(),
    };
    let detail = usecase
        .execute(
            title_id,
            UpdateTitleInput {
                name: body.name,
                year: body.year,
                description: body.description,
                category: body.category,
                genres: body.genre,
            },
        )
        .await?;
    Ok(Json(detail.into()))
}

// ── DELETE /titles/{title_id} ────────────────────────────────────────────────

pub async fn delete_title(
    identity: Identity,
    State(state): State<AppState>,
    Path(title_id): Path<i32>,
) -> Result<StatusCode, ApiServiceError> {
    if !identity.caps.administer {
        return Err(ApiServiceError::Forbidden);
    }
    let usecase = DeleteTitleUseCase {
        titles: state.title_repo(),
    };
    usecase.execute(title_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
