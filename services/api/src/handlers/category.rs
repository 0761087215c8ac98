use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use critiq_auth_types::identity::Identity;
use critiq_domain::pagination::PageRequest;

use crate::domain::types::Category;
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::category::{
    CreateCategoryInput, CreateCategoryUseCase, DeleteCategoryUseCase, ListCategoriesUseCase,
};

#[derive(Serialize)]
pub struct CategoryResponse {
    pub name: String,
    pub slug: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            name: category.name,
            slug: category.slug,
        }
    }
}

// ── GET /categories ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CategoryListQuery {
    pub search: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn get_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<Vec<CategoryResponse>>, ApiServiceError> {
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    }
    .clamped();
    let usecase = ListCategoriesUseCase {
        repo: state.category_repo(),
    };
    let categories = usecase.execute(query.search, page).await?;
    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

// ── POST /categories ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
}

pub async fn create_category(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiServiceError> {
    if !identity.caps.administer {
        return Err(ApiServiceError::Forbidden);
    }
    let usecase = CreateCategoryUseCase {
        repo: state.category_repo(),
    };
    let category = usecase
        .execute(CreateCategoryInput {
            name: body.name,
            slug: body.slug,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

// ── DELETE /categories/{slug} ────────────────────────────────────────────────

pub async fn delete_category(
    identity: Identity,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiServiceError> {
    if !identity.caps.administer {
        return Err(ApiServiceError::Forbidden);
    }
    let usecase = DeleteCategoryUseCase {
        repo: state.category_repo(),
    };
    usecase.execute(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
