#![allow(async_fn_in_trait)]

use uuid::Uuid;

use critiq_domain::pagination::PageRequest;

use crate::domain::types::{
    Category, Comment, CommentDraft, Genre, OutboxEvent, Review, ReviewDraft, Title, TitleDetail,
    TitleDraft, TitleFilter, User,
};
use crate::error::ApiServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiServiceError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiServiceError>;

    /// List users, optionally filtered by a case-insensitive username substring.
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<User>, ApiServiceError>;

    async fn create(&self, user: &User) -> Result<(), ApiServiceError>;

    /// Insert the user and an outbox event in a single transaction.
    async fn create_with_outbox(
        &self,
        user: &User,
        event: &OutboxEvent,
    ) -> Result<(), ApiServiceError>;

    /// Overwrite the mutable profile fields of an existing user.
    async fn update(&self, user: &User) -> Result<(), ApiServiceError>;

    /// Rotate the confirmation code and enqueue the outbox event in a
    /// single transaction.
    async fn set_confirmation_code(
        &self,
        user_id: Uuid,
        code: &str,
        event: &OutboxEvent,
    ) -> Result<(), ApiServiceError>;

    /// Delete a user. Returns `true` if a row was deleted.
    async fn delete_by_username(&self, username: &str) -> Result<bool, ApiServiceError>;
}

/// Repository for catalog categories.
pub trait CategoryRepository: Send + Sync {
    /// List categories, optionally filtered by a case-insensitive name substring.
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<Category>, ApiServiceError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, ApiServiceError>;

    async fn create(&self, name: &str, slug: &str) -> Result<Category, ApiServiceError>;

    /// Delete a category. Returns `true` if a row was deleted.
    async fn delete_by_slug(&self, slug: &str) -> Result<bool, ApiServiceError>;
}

/// Repository for catalog genres.
pub trait GenreRepository: Send + Sync {
    /// List genres, optionally filtered by a case-insensitive name substring.
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<Genre>, ApiServiceError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Genre>, ApiServiceError>;

    /// Resolve a set of genre slugs to full rows, preserving request order.
    async fn find_by_slugs(&self, slugs: &[String]) -> Result<Vec<Genre>, ApiServiceError>;

    async fn create(&self, name: &str, slug: &str) -> Result<Genre, ApiServiceError>;

    /// Delete a genre. Returns `true` if a row was deleted.
    async fn delete_by_slug(&self, slug: &str) -> Result<bool, ApiServiceError>;
}

/// Repository for titles and their genre/category links.
pub trait TitleRepository: Send + Sync {
    async fn list(
        &self,
        filter: &TitleFilter,
        page: PageRequest,
    ) -> Result<Vec<TitleDetail>, ApiServiceError>;

    async fn find_detail(&self, id: i32) -> Result<Option<TitleDetail>, ApiServiceError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Title>, ApiServiceError>;

    /// Insert the title and its genre links in a single transaction.
    async fn create(&self, draft: &TitleDraft) -> Result<Title, ApiServiceError>;

    /// Update title fields; when `genre_ids` is `Some`, replace the genre
    /// links in the same transaction.
    async fn update(
        &self,
        title: &Title,
        genre_ids: Option<&[i32]>,
    ) -> Result<(), ApiServiceError>;

    /// Delete a title. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiServiceError>;
}

/// Repository for reviews.
pub trait ReviewRepository: Send + Sync {
    async fn list_by_title(
        &self,
        title_id: i32,
        page: PageRequest,
    ) -> Result<Vec<Review>, ApiServiceError>;

    async fn find(
        &self,
        title_id: i32,
        review_id: i32,
    ) -> Result<Option<Review>, ApiServiceError>;

    async fn exists_for(&self, title_id: i32, author_id: Uuid) -> Result<bool, ApiServiceError>;

    /// Insert a review. A lost race on the (title, author) unique index
    /// maps to `Conflict`.
    async fn create(&self, draft: &ReviewDraft) -> Result<Review, ApiServiceError>;

    async fn update_text_score(
        &self,
        review_id: i32,
        text: Option<&str>,
        score: Option<i16>,
    ) -> Result<(), ApiServiceError>;

    /// Delete a review. Returns `true` if a row was deleted.
    async fn delete(&self, review_id: i32) -> Result<bool, ApiServiceError>;
}

/// Repository for comments on reviews.
pub trait CommentRepository: Send + Sync {
    async fn list_by_review(
        &self,
        review_id: i32,
        page: PageRequest,
    ) -> Result<Vec<Comment>, ApiServiceError>;

    async fn find(
        &self,
        review_id: i32,
        comment_id: i32,
    ) -> Result<Option<Comment>, ApiServiceError>;

    async fn create(&self, draft: &CommentDraft) -> Result<Comment, ApiServiceError>;

    async fn update_text(&self, comment_id: i32, text: &str) -> Result<(), ApiServiceError>;

    /// Delete a comment. Returns `true` if a row was deleted.
    async fn delete(&self, comment_id: i32) -> Result<bool, ApiServiceError>;
}
