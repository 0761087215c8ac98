use critiq_domain::pagination::PageRequest;

use crate::domain::repository::GenreRepository;
use crate::domain::types::{Genre, validate_catalog_name, validate_slug};
use crate::error::ApiServiceError;

// ── ListGenres ───────────────────────────────────────────────────────────────

pub struct ListGenresUseCase<R: GenreRepository> {
    pub repo: R,
}

impl<R: GenreRepository> ListGenresUseCase<R> {
    pub async fn execute(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Vec<Genre>, ApiServiceError> {
        self.repo.list(search.as_deref(), page).await
    }
}

// ── CreateGenre ──────────────────────────────────────────────────────────────

pub struct CreateGenreInput {
    pub name: String,
    pub slug: String,
}

pub struct CreateGenreUseCase<R: GenreRepository> {
    pub repo: R,
}

impl<R: GenreRepository> CreateGenreUseCase<R> {
    pub async fn execute(&self, input: CreateGenreInput) -> Result<Genre, ApiServiceError> {
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

// ── DeleteGenre ──────────────────────────────────────────────────────────────

pub struct DeleteGenreUseCase<R: GenreRepository> {
    pub repo: R,
}

impl<R: GenreRepository> DeleteGenreUseCase<R> {
    pub async fn execute(&self, slug: &str) -> Result<(), ApiServiceError> {
        if self.repo.delete_by_slug(slug).await? {
            Ok(())
        } else {
            Err(ApiServiceError::GenreNotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockGenreRepo {
        existing: Option<Genre>,
        delete_result: bool,
    }

    impl GenreRepository for MockGenreRepo {
        async fn list(
            &self,
            _search: Option<&str>,
            _page: PageRequest,
        ) -> Result<Vec<Genre>, ApiServiceError> {
            Ok(vec![])
        }
        async fn find_by_slug(&self, _slug: &str) -> Result<Option<Genre>, ApiServiceError> {
            Ok(self.existing.clone())
        }
        async fn find_by_slugs(&self, _slugs: &[String]) -> Result<Vec<Genre>, ApiServiceError> {
            Ok(vec![])
        }
        async fn create(&self, name: &str, slug: &str) -> Result<Genre, ApiServiceError> {
            Ok(Genre {
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
    async fn should_create_genre() {
        let usecase = CreateGenreUseCase {
            repo: MockGenreRepo::default(),
        };
        let genre = usecase
            .execute(CreateGenreInput {
                name: "Science Fiction".into(),
                slug: "sci-fi".into(),
            })
            .await
            .unwrap();
        assert_eq!(genre.slug, "sci-fi");
    }

    #[tokio::test]
    async fn should_reject_uppercase_slug() {
        let usecase = CreateGenreUseCase {
            repo: MockGenreRepo::default(),
        };
        let result = usecase
            .execute(CreateGenreInput {
                name: "Science Fiction".into(),
                slug: "Sci-Fi".into(),
            })
            .await;
        assert!(matches!(result, Err(ApiServiceError::InvalidSlug)));
    }

    #[tokio::test]
    async fn should_reject_duplicate_slug() {
        let usecase = CreateGenreUseCase {
            repo: MockGenreRepo {
                existing: Some(Genre {
                    id: 1,
                    name: "Drama".into(),
                    slug: "drama".into(),
                }),
                ..Default::default()
            },
        };
        let result = usecase
            .execute(CreateGenreInput {
                name: "Drama".into(),
                slug: "drama".into(),
            })
            .await;
        assert!(matches!(result, Err(ApiServiceError::Conflict)));
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_missing_genre() {
        let usecase = DeleteGenreUseCase {
            repo: MockGenreRepo::default(),
        };
        let result = usecase.execute("ghost").await;
        assert!(matches!(result, Err(ApiServiceError::GenreNotFound)));
    }
}
