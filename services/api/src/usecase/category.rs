use critiq_domain::pagination::PageRequest;

use crate::domain::repository::CategoryRepository;
use crate::domain::types::{Category, validate_catalog_name, validate_slug};
use crate::error::ApiServiceError;

// ── ListCategories ───────────────────────────────────────────────────────────

pub struct ListCategoriesUseCase<R: CategoryRepository> {
    pub repo: R,
}

impl<R: CategoryRepository> ListCategoriesUseCase<R> {
    pub async fn execute(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Vec<Category>, ApiServiceError> {
        self.repo.list(search.as_deref(), page).await
    }
}

// ── CreateCategory ───────────────────────────────────────────────────────────

pub struct CreateCategoryInput {
    pub name: String,
    pub slug: String,
}

pub struct CreateCategoryUseCase<R: CategoryRepository> {
    pub repo: R,
}

impl<R: CategoryRepository> CreateCategoryUseCase<R> {
    pub async fn execute(&self, input: CreateCategoryInput) -> Result<Category, ApiServiceError> {
        if !validate_catalog_name(&input.name) {
            return Err(ApiServiceError::MissingData);
        }
        if !validate_slug(&input.slug) {
            return Err(ApiServiceError::InvalidSlug);
        }
        if self.repo.find_by_slug(&input.slug).await?.is_some() {
            return Err(ApiServiceError::Conflict);
        }
        self.repo.create(&input.name, &input.slug).await
    }
}

// ── DeleteCategory ───────────────────────────────────────────────────────────

pub struct DeleteCategoryUseCase<R: CategoryRepository> {
    pub repo: R,
}

impl<R: CategoryRepository> DeleteCategoryUseCase<R> {
    pub async fn execute(&self, slug: &str) -> Result<(), ApiServiceError> {
        if self.repo.delete_by_slug(slug).await? {
            Ok(())
        } else {
            Err(ApiServiceError::CategoryNotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockCategoryRepo {
        existing: Option<Category>,
        delete_result: bool,
    }

    impl CategoryRepository for MockCategoryRepo {
        async fn list(
            &self,
            _search: Option<&str>,
            _page: PageRequest,
        ) -> Result<Vec<Category>, ApiServiceError> {
            Ok(vec![])
        }
        async fn find_by_slug(&self, _slug: &str) -> Result<Option<Category>, ApiServiceError> {
            Ok(self.existing.clone())
        }
        async fn create(&self, name: &str, slug: &str) -> Result<Category, ApiServiceError> {
            Ok(Category {
                id: 1,
                name: name.to_owned(),
                slug: slug.to_owned(),
            })
        }
        async fn delete_by_slug(&self, _slug: &str) -> Result<bool, ApiServiceError> {
            Ok(self.delete_result)
        }
    }

    #[tokio::test]
    async fn should_create_category() {
        let usecase = CreateCategoryUseCase {
            repo: MockCategoryRepo::default(),
        };
        let category = usecase
            .execute(CreateCategoryInput {
                name: "Movies".into(),
                slug: "movies".into(),
            })
            .await
            .unwrap();
        assert_eq!(category.slug, "movies");
    }

    #[tokio::test]
    async fn should_reject_invalid_slug() {
        let usecase = CreateCategoryUseCase {
            repo: MockCategoryRepo::default(),
        };
        let result = usecase
            .execute(CreateCategoryInput {
                name: "Movies".into(),
                slug: "Not A Slug".into(),
            })
            .await;
        assert!(matches!(result, Err(ApiServiceError::InvalidSlug)));
    }

    #[tokio::test]
    async fn should_reject_duplicate_slug() {
        let usecase = CreateCategoryUseCase {
            repo: MockCategoryRepo {
                existing: Some(Category {
                    id: 1,
                    name: "Movies".into(),
                    slug: "movies".into(),
                }),
                ..Default::default()
            },
        };
        let result = usecase
            .execute(CreateCategoryInput {
                name: "Movies again".into(),
                slug: "movies".into(),
            })
            .await;
        assert!(matches!(result, Err(ApiServiceError::Conflict)));
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_missing_category() {
        let usecase = DeleteCategoryUseCase {
            repo: MockCategoryRepo::default(),
        };
        let result = usecase.execute("ghost").await;
        assert!(matches!(result, Err(ApiServiceError::CategoryNotFound)));
    }
}
