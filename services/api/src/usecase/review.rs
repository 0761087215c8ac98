use uuid::Uuid;

use critiq_domain::capability::Capabilities;
use critiq_domain::pagination::PageRequest;

use crate::domain::repository::{ReviewRepository, TitleRepository};
use crate::domain::types::{Review, ReviewDraft, validate_score};
use crate::error::ApiServiceError;

// ── ListReviews ──────────────────────────────────────────────────────────────

pub struct ListReviewsUseCase<R, T>
where
    R: ReviewRepository,
    T: TitleRepository,
{
    pub reviews: R,
    pub titles: T,
}

impl<R, T> ListReviewsUseCase<R, T>
where
    R: ReviewRepository,
    T: TitleRepository,
{
    pub async fn execute(
        &self,
        title_id: i32,
        page: PageRequest,
    ) -> Result<Vec<Review>, ApiServiceError> {
        if self.titles.find_by_id(title_id).await?.is_none() {
            return Err(ApiServiceError::TitleNotFound);
        }
        self.reviews.list_by_title(title_id, page).await
    }
}

// ── GetReview ────────────────────────────────────────────────────────────────

pub struct GetReviewUseCase<R, T>
where
    R: ReviewRepository,
    T: TitleRepository,
{
    pub reviews: R,
    pub titles: T,
}

impl<R, T> GetReviewUseCase<R, T>
where
    R: ReviewRepository,
    T: TitleRepository,
{
    pub async fn execute(
        &self,
        title_id: i32,
        review_id: i32,
    ) -> Result<Review, ApiServiceError> {
        if self.titles.find_by_id(title_id).await?.is_none() {
            return Err(ApiServiceError::TitleNotFound);
        }
        self.reviews
            .find(title_id, review_id)
            .await?
            .ok_or(ApiServiceError::ReviewNotFound)
    }
}

// ── CreateReview ─────────────────────────────────────────────────────────────

pub struct CreateReviewInput {
    pub title_id: i32,
    pub author_id: Uuid,
    pub text: String,
    pub score: i16,
}

pub struct CreateReviewUseCase<R, T>
where
    R: ReviewRepository,
    T: TitleRepository,
{
    pub reviews: R,
    pub titles: T,
}

impl<R, T> CreateReviewUseCase<R, T>
where
    R: ReviewRepository,
    T: TitleRepository,
{
    /// Create a review. One review per (title, author): a pre-check catches
    /// the common case as a 400, the unique index catches the race as a 409.
    pub async fn execute(&self, input: CreateReviewInput) -> Result<Review, ApiServiceError> {
        if input.text.is_empty() {
            return Err(ApiServiceError::MissingData);
        }
        if !validate_score(input.score) {
            return Err(ApiServiceError::InvalidScore);
        }
        if self.titles.find_by_id(input.title_id).await?.is_none() {
            return Err(ApiServiceError::TitleNotFound);
        }
        if self
            .reviews
            .exists_for(input.title_id, input.author_id)
            .await?
        {
            return Err(ApiServiceError::DuplicateReview);
        }
        let draft = ReviewDraft {
            title_id: input.title_id,
            author_id: input.author_id,
            text: input.text,
            score: input.score,
        };
        self.reviews.create(&draft).await
    }
}

// ── UpdateReview ─────────────────────────────────────────────────────────────

pub struct UpdateReviewInput {
    pub text: Option<String>,
    pub score: Option<i16>,
}

pub struct UpdateReviewUseCase<R, T>
where
    R: ReviewRepository,
    T: TitleRepository,
{
    pub reviews: R,
    pub titles: T,
}

impl<R, T> UpdateReviewUseCase<R, T>
where
    R: ReviewRepository,
    T: TitleRepository,
{
    pub async fn execute(
        &self,
        title_id: i32,
        review_id: i32,
        caller_id: Uuid,
        caps: Capabilities,
        input: UpdateReviewInput,
    ) -> Result<Review, ApiServiceError> {
        if input.text.is_none() && input.score.is_none() {
            return Err(ApiServiceError::MissingData);
        }
        if let Some(score) = input.score {
            if !validate_score(score) {
                return Err(ApiServiceError::InvalidScore);
            }
        }
        if self.titles.find_by_id(title_id).await?.is_none() {
            return Err(ApiServiceError::TitleNotFound);
        }
        let mut review = self
            .reviews
            .find(title_id, review_id)
            .await?
            .ok_or(ApiServiceError::ReviewNotFound)?;
        if !caps.can_modify(review.author_id == caller_id) {
            return Err(ApiServiceError::Forbidden);
        }
        self.reviews
            .update_text_score(review_id, input.text.as_deref(), input.score)
            .await?;
        if let Some(text) = input.text {
            review.text = text;
        }
        if let Some(score) = input.score {
            review.score = score;
        }
        Ok(review)
    }
}

// ── DeleteReview ─────────────────────────────────────────────────────────────

pub struct DeleteReviewUseCase<R, T>
where
    R: ReviewRepository,
    T: TitleRepository,
{
    pub reviews: R,
    pub titles: T,
}

impl<R, T> DeleteReviewUseCase<R, T>
where
    R: ReviewRepository,
    T: TitleRepository,
{
    pub async fn execute(
        &self,
        title_id: i32,
        review_id: i32,
        caller_id: Uuid,
        caps: Capabilities,
    ) -> Result<(), ApiServiceError> {
        if self.titles.find_by_id(title_id).await?.is_none() {
            return Err(ApiServiceError::TitleNotFound);
        }
        let review = self
            .reviews
            .find(title_id, review_id)
            .await?
            .ok_or(ApiServiceError::ReviewNotFound)?;
        if !caps.can_modify(review.author_id == caller_id) {
            return Err(ApiServiceError::Forbidden);
        }
        self.reviews.delete(review_id).await?;
        Ok(())
    }
}
