use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use critiq_auth_types::identity::Identity;
use critiq_domain::pagination::PageRequest;

use crate::domain::types::Genre;
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::genre::{
    CreateGenreInput, CreateGenreUseCase, DeleteGenreUseCase, ListGenresUseCase,
};

#[derive(Serialize)]
pub struct GenreResponse {
    pub name: String,
    pub slug: String,
}

impl From<Genre> for GenreResponse {
    fn from(genre: Genre) -> Self {
        Self {
            name: genre.name,
            slug: genre.slug,
        }
    }
}

// ── GET /genres ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GenreListQuery {
    pub search: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn get_genres(
    State(state): State<AppState>,
    Query(query): Query<GenreListQuery>,
) -> Result<Json<Vec<GenreResponse>>, ApiServiceError> {
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    }
    .clamped();
    let usecase = ListGenresUseCase {
        repo: state.genre_repo(),
    };
    let genres = usecase.execute(query.search, page).await?;
    Ok(Json(genres.into_iter().map(GenreResponse::from).collect()))
}

// ── POST /genres ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateGenreRequest {
    pub name: String,
    pub slug: String,
}

pub async fn create_genre(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateGenreRequest>,
) -> Result<(StatusCode, Json<GenreResponse>), ApiServiceError> {
    if !identity.caps.administer {
        return Err(ApiServiceError::Forbidden);
    }
    let usecase = CreateGenreUseCase {
        repo: state.genre_repo(),
    };
    let genre = usecase
        .execute(CreateGenreInput {
            name: body.name,
            slug: body.slug,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(genre.into())))
}

// ── DELETE /genres/{slug} ────────────────────────────────────────────────────

pub async fn delete_genre(
    identity: Identity,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiServiceError> {
    if !identity.caps.administer {
        return Err(ApiServiceError::Forbidden);
    }
    let usecase = DeleteGenreUseCase {
        repo: state.genre_repo(),
    };
    usecase.execute(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
