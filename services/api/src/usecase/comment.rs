use uuid::Uuid;

use critiq_domain::capability::Capabilities;
use critiq_domain::pagination::PageRequest;

use crate::domain::repository::{CommentRepository, ReviewRepository};
use crate::domain::types::{Comment, CommentDraft};
use crate::error::ApiServiceError;

// ── ListComments ─────────────────────────────────────────────────────────────

pub struct ListCommentsUseCase<C, R>
where
    C: CommentRepository,
    R: ReviewRepository,
{
    pub comments: C,
    pub reviews: R,
}

impl<C, R> ListCommentsUseCase<C, R>
where
    C: CommentRepository,
    R: ReviewRepository,
{
    pub async fn execute(
        &self,
        title_id: i32,
        review_id: i32,
        page: PageRequest,
    ) -> Result<Vec<Comment>, ApiServiceError> {
        if self.reviews.find(title_id, review_id).await?.is_none() {
            return Err(ApiServiceError::ReviewNotFound);
        }
        self.comments.list_by_review(review_id, page).await
    }
}

// ── GetComment ───────────────────────────────────────────────────────────────

pub struct GetCommentUseCase<C, R>
where
    C: CommentRepository,
    R: ReviewRepository,
{
    pub comments: C,
    pub reviews: R,
}

impl<C, R> GetCommentUseCase<C, R>
where
    C: CommentRepository,
    R: ReviewRepository,
{
    pub async fn execute(
        &self,
        title_id: i32,
        review_id: i32,
        comment_id: i32,
    ) -> Result<Comment, ApiServiceError> {
        if self.reviews.find(title_id, review_id).await?.is_none() {
            return Err(ApiServiceError::ReviewNotFound);
        }
        self.comments
            .find(review_id, comment_id)
            .await?
            .ok_or(ApiServiceError::CommentNotFound)
    }
}

// ── CreateComment ────────────────────────────────────────────────────────────

pub struct CreateCommentInput {
    pub title_id: i32,
    pub review_id: i32,
    pub author_id: Uuid,
    pub text: String,
}

pub struct CreateCommentUseCase<C, R>
where
    C: CommentRepository,
    R: ReviewRepository,
{
    pub comments: C,
    pub reviews: R,
}

impl<C, R> CreateCommentUseCase<C, R>
where
    C: CommentRepository,
    R: ReviewRepository,
{
    pub async fn execute(&self, input: CreateCommentInput) -> Result<Comment, ApiServiceError> {
        if input.text.is_empty() {
            return Err(ApiServiceError::MissingData);
        }
        // The review must exist under the title named in the path.
        if self
            .reviews
            .find(input.title_id, input.review_id)
            .await?
            .is_none()
        {
            return Err(ApiServiceError::ReviewNotFound);
        }
        let draft = CommentDraft {
            review_id: input.review_id,
            author_id: input.author_id,
            text: input.text,
        };
        self.comments.create(&draft).await
    }
}

// ── UpdateComment ────────────────────────────────────────────────────────────

pub struct UpdateCommentUseCase<C, R>
where
    C: CommentRepository,
    R: ReviewRepository,
{
    pub comments: C,
    pub reviews: R,
}

impl<C, R> UpdateCommentUseCase<C, R>
where
    C: CommentRepository,
    R: ReviewRepository,
{
    pub async fn execute(
        &self,
        title_id: i32,
        review_id: i32,
        comment_id: i32,
        caller_id: Uuid,
        caps: Capabilities,
        text: String,
    ) -> Result<Comment, ApiServiceError> {
        if text.is_empty() {
            return Err(ApiServiceError::MissingData);
        }
        if self.reviews.find(title_id, review_id).await?.is_none() {
            return Err(ApiServiceError::ReviewNotFound);
        }
        let mut comment = self
            .comments
            .find(review_id, comment_id)
            .await?
            .ok_or(ApiServiceError::CommentNotFound)?;
        if !caps.can_modify(comment.author_id == caller_id) {
            return Err(ApiServiceError::Forbidden);
        }
        self.comments.update_text(comment_id, &text).await?;
        comment.text = text;
        Ok(comment)
    }
}

// ── DeleteComment ────────────────────────────────────────────────────────────

pub struct DeleteCommentUseCase<C, R>
where
    C: CommentRepository,
    R: ReviewRepository,
{
    pub comments: C,
    pub reviews: R,
}

impl<C, R> DeleteCommentUseCase<C, R>
where
    C: CommentRepository,
    R: ReviewRepository,
{
    pub async fn execute(
        &self,
        title_id: i32,
        review_id: i32,
        comment_id: i32,
        caller_id: Uuid,
        caps: Capabilities,
    ) -> Result<(), ApiServiceError> {
        if self.reviews.find(title_id, review_id).await?.is_none() {
            return Err(ApiServiceError::ReviewNotFound);
        }
        let comment = self
            .comments
            .find(review_id, comment_id)
            .await?
            .ok_or(ApiServiceError::CommentNotFound)?;
        if !caps.can_modify(comment.author_id == caller_id) {
            return Err(ApiServiceError::Forbidden);
        }
        self.comments.delete(comment_id).await?;
        Ok(())
    }
}
