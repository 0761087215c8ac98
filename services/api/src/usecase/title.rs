use critiq_domain::pagination::PageRequest;

use crate::domain::repository::{CategoryRepository, GenreRepository, TitleRepository};
use crate::domain::types::{
    Title, TitleDetail, TitleDraft, TitleFilter, validate_catalog_name, validate_year,
};
use crate::error::ApiServiceError;

// ── ListTitles ───────────────────────────────────────────────────────────────

pub struct ListTitlesUseCase<T: TitleRepository> {
    pub titles: T,
}

impl<T: TitleRepository> ListTitlesUseCase<T> {
    pub async fn execute(
        &self,
        filter: TitleFilter,
        page: PageRequest,
    ) -> Result<Vec<TitleDetail>, ApiServiceError> {
        self.titles.list(&filter, page).await
    }
}

// ── GetTitle ─────────────────────────────────────────────────────────────────

pub struct GetTitleUseCase<T: TitleRepository> {
    pub titles: T,
}

impl<T: TitleRepository> GetTitleUseCase<T> {
    pub async fn execute(&self, title_id: i32) -> Result<TitleDetail, ApiServiceError> {
        self.titles
            .find_detail(title_id)
            .await?
            .ok_or(ApiServiceError::TitleNotFound)
    }
}

// ── CreateTitle ──────────────────────────────────────────────────────────────

pub struct CreateTitleInput {
    pub name: String,
    pub year: i16,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genres: Vec<String>,
}

pub struct CreateTitleUseCase<T, C, G>
where
    T: TitleRepository,
    C: CategoryRepository,
    G: GenreRepository,
{
    pub titles: T,
    pub categories: C,
    pub genres: G,
}

impl<T, C, G> CreateTitleUseCase<T, C, G>
where
    T: TitleRepository,
    C: CategoryRepository,
    G: GenreRepository,
{
    pub async fn execute(&self, input: CreateTitleInput) -> Result<TitleDetail, ApiServiceError> {
        if !validate_catalog_name(&input.name) {
            return Err(ApiServiceError::MissingData);
        }
        if !validate_year(input.year) {
            return Err(ApiServiceError::InvalidYear);
        }

        let category = match input.category.as_deref() {
            Some(slug) => Some(
                self.categories
                    .find_by_slug(slug)
                    .await?
                    .ok_or(ApiServiceError::UnknownCategory)?,
            ),
            None => None,
        };

        let genres = self.genres.find_by_slugs(&input.genres).await?;
        if genres.len() != input.genres.len() {
            return Err(ApiServiceError::UnknownGenre);
        }

        let draft = TitleDraft {
            name: input.name,
            year: input.year,
            description: input.description,
            category_id: category.as_ref().map(|c| c.id),
            genre_ids: genres.iter().map(|g| g.id).collect(),
        };
        let title = self.titles.create(&draft).await?;

        // Freshly created, so no reviews yet.
        Ok(TitleDetail {
            title,
            category,
            genres,
            rating: None,
        })
    }
}

// ── UpdateTitle ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateTitleInput {
    pub name: Option<String>,
    pub year: Option<i16>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genres: Option<Vec<String>>,
}

impl UpdateTitleInput {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.year.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.genres.is_none()
    }
}

pub struct UpdateTitleUseCase<T, C, G>
where
    T: TitleRepository,
    C: CategoryRepository,
    G: GenreRepository,
{
    pub titles: T,
    pub categories: C,
    pub genres: G,
}

impl<T, C, G> UpdateTitleUseCase<T, C, G>
where
    T: TitleRepository,
    C: CategoryRepository,
    G: GenreRepository,
{
    pub async fn execute(
        &self,
        title_id: i32,
        input: UpdateTitleInput,
    ) -> Result<TitleDetail, ApiServiceError> {
        if input.is_empty() {
            return Err(ApiServiceError::MissingData);
        }
        let mut title = self
            .titles
            .find_by_id(title_id)
            .await?
            .ok_or(ApiServiceError::TitleNotFound)?;

        if let Some(name) = input.name {
            if !validate_catalog_name(&name) {
                return Err(ApiServiceError::MissingData);
            }
            title.name = name;
        }
        if let Some(year) = input.year {
            if !validate_year(year) {
                return Err(ApiServiceError::InvalidYear);
            }
            title.year = year;
        }
        if let Some(description) = input.description {
            title.description = Some(description);
        }
        if let Some(slug) = input.category.as_deref() {
            let category = self
                .categories
                .find_by_slug(slug)
                .await?
                .ok_or(ApiServiceError::UnknownCategory)?;
            title.category_id = Some(category.id);
        }

        let genre_ids = match input.genres {
            Some(slugs) => {
                let genres = self.genres.find_by_slugs(&slugs).await?;
                if genres.len() != slugs.len() {
                    return Err(ApiServiceError::UnknownGenre);
                }
                Some(genres.iter().map(|g| g.id).collect::<Vec<_>>())
            }
            None => None,
        };

        self.titles.update(&title, genre_ids.as_deref()).await?;

        self.titles
            .find_detail(title_id)
            .await?
            .ok_or(ApiServiceError::TitleNotFound)
    }
}

// ── DeleteTitle ──────────────────────────────────────────────────────────────

pub struct DeleteTitleUseCase<T: TitleRepository> {
    pub titles: T,
}

impl<T: TitleRepository> DeleteTitleUseCase<T> {
    pub async fn execute(&self, title_id: i32) -> Result<(), ApiServiceError> {
        if self.titles.delete(title_id).await? {
            Ok(())
        } else {
            Err(ApiServiceError::TitleNotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::domain::types::{Category, Genre};

    #[derive(Default)]
    struct MockTitleRepo {
        title: Option<Title>,
        detail: Option<TitleDetail>,
        created: Mutex<Option<TitleDraft>>,
        updated: Mutex<Option<(Title, Option<Vec<i32>>)>>,
        delete_result: bool,
    }

    impl TitleRepository for MockTitleRepo {
        async fn list(
            &self,
            _filter: &TitleFilter,
            _page: PageRequest,
        ) -> Result<Vec<TitleDetail>, ApiServiceError> {
            Ok(vec![])
        }
        async fn find_detail(&self, _id: i32) -> Result<Option<TitleDetail>, ApiServiceError> {
            Ok(self.detail.clone())
        }
        async fn find_by_id(&self, _id: i32) -> Result<Option<Title>, ApiServiceError> {
            Ok(self.title.clone())
        }
        async fn create(&self, draft: &TitleDraft) -> Result<Title, ApiServiceError> {
            *self.created.lock().unwrap() = Some(draft.clone());
            Ok(Title {
                id: 1,
                name: draft.name.clone(),
                year: draft.year,
                description: draft.description.clone(),
                category_id: draft.category_id,
            })
        }
        async fn update(
            &self,
            title: &Title,
            genre_ids: Option<&[i32]>,
        ) -> Result<(), ApiServiceError> {
            *self.updated.lock().unwrap() = Some((title.clone(), genre_ids.map(<[i32]>::to_vec)));
            Ok(())
        }
        async fn delete(&self, _id: i32) -> Result<bool, ApiServiceError> {
            Ok(self.delete_result)
        }
    }

    #[derive(Default)]
    struct MockCategoryRepo {
        category: Option<Category>,
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
            Ok(self.category.clone())
        }
        async fn create(&self, _name: &str, _slug: &str) -> Result<Category, ApiServiceError> {
            unreachable!()
        }
        async fn delete_by_slug(&self, _slug: &str) -> Result<bool, ApiServiceError> {
            Ok(false)
        }
    }

    #[derive(Default)]
    struct MockGenreRepo {
        genres: Vec<Genre>,
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
            Ok(None)
        }
        async fn find_by_slugs(&self, slugs: &[String]) -> Result<Vec<Genre>, ApiServiceError> {
            Ok(self
                .genres
                .iter()
                .filter(|g| slugs.contains(&g.slug))
                .cloned()
                .collect())
        }
        async fn create(&self, _name: &str, _slug: &str) -> Result<Genre, ApiServiceError> {
            unreachable!()
        }
        async fn delete_by_slug(&self, _slug: &str) -> Result<bool, ApiServiceError> {
            Ok(false)
        }
    }

    fn sci_fi() -> Genre {
        Genre {
            id: 7,
            name: "Science Fiction".into(),
            slug: "sci-fi".into(),
        }
    }

    fn books() -> Category {
        Category {
            id: 3,
            name: "Books".into(),
            slug: "books".into(),
        }
    }

    #[tokio::test]
    async fn should_create_title_with_resolved_references() {
        let usecase = CreateTitleUseCase {
            titles: MockTitleRepo::default(),
            categories: MockCategoryRepo {
                category: Some(books()),
            },
            genres: MockGenreRepo {
                genres: vec![sci_fi()],
            },
        };
        let detail = usecase
            .execute(CreateTitleInput {
                name: "Dune".into(),
                year: 1965,
                description: None,
                category: Some("books".into()),
                genres: vec!["sci-fi".into()],
            })
            .await
            .unwrap();

        assert_eq!(detail.title.name, "Dune");
        assert_eq!(detail.category.unwrap().id, 3);
        assert_eq!(detail.genres.len(), 1);
        assert!(detail.rating.is_none());

        let draft = usecase.titles.created.lock().unwrap().clone().unwrap();
        assert_eq!(draft.category_id, Some(3));
        assert_eq!(draft.genre_ids, vec![7]);
    }

    #[tokio::test]
    async fn should_reject_unknown_category_slug() {
        let usecase = CreateTitleUseCase {
            titles: MockTitleRepo::default(),
            categories: MockCategoryRepo::default(),
            genres: MockGenreRepo::default(),
        };
        let result = usecase
            .execute(CreateTitleInput {
                name: "Dune".into(),
                year: 1965,
                description: None,
                category: Some("ghost".into()),
                genres: vec![],
            })
            .await;
        assert!(matches!(result, Err(ApiServiceError::UnknownCategory)));
    }

    #[tokio::test]
    async fn should_reject_unknown_genre_slug() {
        let usecase = CreateTitleUseCase {
            titles: MockTitleRepo::default(),
            categories: MockCategoryRepo::default(),
            genres: MockGenreRepo::default(),
        };
        let result = usecase
            .execute(CreateTitleInput {
                name: "Dune".into(),
                year: 1965,
                description: None,
                category: None,
                genres: vec!["ghost".into()],
            })
            .await;
        assert!(matches!(result, Err(ApiServiceError::UnknownGenre)));
    }

    #[tokio::test]
    async fn should_reject_future_year() {
        let usecase = CreateTitleUseCase {
            titles: MockTitleRepo::default(),
            categories: MockCategoryRepo::default(),
            genres: MockGenreRepo::default(),
        };
        let result = usecase
            .execute(CreateTitleInput {
                name: "From the future".into(),
                year: 9000,
                description: None,
                category: None,
                genres: vec![],
            })
            .await;
        assert!(matches!(result, Err(ApiServiceError::InvalidYear)));
    }

    #[tokio::test]
    async fn should_update_title_and_replace_genres() {
        let title = Title {
            id: 1,
            name: "Dune".into(),
            year: 1965,
            description: None,
            category_id: None,
        };
        let detail = TitleDetail {
            title: title.clone(),
            category: None,
            genres: vec![sci_fi()],
            rating: Some(8.0),
        };
        let usecase = UpdateTitleUseCase {
            titles: MockTitleRepo {
                title: Some(title),
                detail: Some(detail),
                ..Default::default()
            },
            categories: MockCategoryRepo::default(),
            genres: MockGenreRepo {
                genres: vec![sci_fi()],
            },
        };
        let result = usecase
            .execute(
                1,
                UpdateTitleInput {
                    name: Some("Dune Messiah".into()),
                    genres: Some(vec!["sci-fi".into()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(result.rating, Some(8.0));

        let (updated, genre_ids) = usecase.titles.updated.lock().unwrap().clone().unwrap();
        assert_eq!(updated.name, "Dune Messiah");
        assert_eq!(genre_ids, Some(vec![7]));
    }

    #[tokio::test]
    async fn should_return_missing_data_for_empty_title_update() {
        let usecase = UpdateTitleUseCase {
            titles: MockTitleRepo::default(),
            categories: MockCategoryRepo::default(),
            genres: MockGenreRepo::default(),
        };
        let result = usecase.execute(1, UpdateTitleInput::default()).await;
        assert!(matches!(result, Err(ApiServiceError::MissingData)));
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_missing_title() {
        let usecase = DeleteTitleUseCase {
            titles: MockTitleRepo::default(),
        };
        let result = usecase.execute(42).await;
        assert!(matches!(result, Err(ApiServiceError::TitleNotFound)));
    }
}
