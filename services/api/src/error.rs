use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// API service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("category not found")]
    CategoryNotFound,
    #[error("genre not found")]
    GenreNotFound,
    #[error("title not found")]
    TitleNotFound,
    #[error("review not found")]
    ReviewNotFound,
    #[error("comment not found")]
    CommentNotFound,
    #[error("user already exists")]
    UserAlreadyExists,
    /// A concurrent writer won a unique-constraint race.
    #[error("conflict")]
    Conflict,
    #[error("invalid username")]
    InvalidUsername,
    #[error("invalid email")]
    InvalidEmail,
    #[error("invalid slug")]
    InvalidSlug,
    #[error("invalid score")]
    InvalidScore,
    #[error("invalid year")]
    InvalidYear,
    /// Title create/update referenced a category slug that does not exist.
    #[error("unknown category")]
    UnknownCategory,
    /// Title create/update referenced a genre slug that does not exist.
    #[error("unknown genre")]
    UnknownGenre,
    #[error("review already exists")]
    DuplicateReview,
    #[error("missing data")]
    MissingData,
    #[error("invalid confirmation code")]
    InvalidConfirmationCode,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::GenreNotFound => "GENRE_NOT_FOUND",
            Self::TitleNotFound => "TITLE_NOT_FOUND",
            Self::ReviewNotFound => "REVIEW_NOT_FOUND",
            Self::CommentNotFound => "COMMENT_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::Conflict => "CONFLICT",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidSlug => "INVALID_SLUG",
            Self::InvalidScore => "INVALID_SCORE",
            Self::InvalidYear => "INVALID_YEAR",
            Self::UnknownCategory => "UNKNOWN_CATEGORY",
            Self::UnknownGenre => "UNKNOWN_GENRE",
            Self::DuplicateReview => "DUPLICATE_REVIEW",
            Self::MissingData => "MISSING_DATA",
            Self::InvalidConfirmationCode => "INVALID_CONFIRMATION_CODE",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound
            | Self::CategoryNotFound
            | Self::GenreNotFound
            | Self::TitleNotFound
            | Self::ReviewNotFound
            | Self::CommentNotFound => StatusCode::NOT_FOUND,
            Self::UserAlreadyExists | Self::Conflict => StatusCode::CONFLICT,
            Self::InvalidUsername
            | Self::InvalidEmail
            | Self::InvalidSlug
            | Self::InvalidScore
            | Self::InvalidYear
            | Self::UnknownCategory
            | Self::UnknownGenre
            | Self::DuplicateReview
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::InvalidConfirmationCode => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::response::IntoResponse;

    async fn assert_error(
        error: ApiServiceError,
        expected_status: StatusCode,
        expected_kind: &str,
        expected_message: &str,
    ) {
        let resp = error.into_response();
        assert_eq!(resp.status(), expected_status);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["kind"], expected_kind);
        assert_eq!(json["message"], expected_message);
    }

    #[tokio::test]
    async fn should_return_user_not_found() {
        assert_error(
            ApiServiceError::UserNotFound,
            StatusCode::NOT_FOUND,
            "USER_NOT_FOUND",
            "user not found",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_title_not_found() {
        assert_error(
            ApiServiceError::TitleNotFound,
            StatusCode::NOT_FOUND,
            "TITLE_NOT_FOUND",
            "title not found",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_review_not_found() {
        assert_error(
            ApiServiceError::ReviewNotFound,
            StatusCode::NOT_FOUND,
            "REVIEW_NOT_FOUND",
            "review not found",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_comment_not_found() {
        assert_error(
            ApiServiceError::CommentNotFound,
            StatusCode::NOT_FOUND,
            "COMMENT_NOT_FOUND",
            "comment not found",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_category_not_found() {
        assert_error(
            ApiServiceError::CategoryNotFound,
            StatusCode::NOT_FOUND,
            "CATEGORY_NOT_FOUND",
            "category not found",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_genre_not_found() {
        assert_error(
            ApiServiceError::GenreNotFound,
            StatusCode::NOT_FOUND,
            "GENRE_NOT_FOUND",
            "genre not found",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_user_already_exists() {
        assert_error(
            ApiServiceError::UserAlreadyExists,
            StatusCode::CONFLICT,
            "USER_ALREADY_EXISTS",
            "user already exists",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_conflict() {
        assert_error(
            ApiServiceError::Conflict,
            StatusCode::CONFLICT,
            "CONFLICT",
            "conflict",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_invalid_username() {
        assert_error(
            ApiServiceError::InvalidUsername,
            StatusCode::BAD_REQUEST,
            "INVALID_USERNAME",
            "invalid username",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_invalid_score() {
        assert_error(
            ApiServiceError::InvalidScore,
            StatusCode::BAD_REQUEST,
            "INVALID_SCORE",
            "invalid score",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_invalid_year() {
        assert_error(
            ApiServiceError::InvalidYear,
            StatusCode::BAD_REQUEST,
            "INVALID_YEAR",
            "invalid year",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_unknown_category() {
        assert_error(
            ApiServiceError::UnknownCategory,
            StatusCode::BAD_REQUEST,
            "UNKNOWN_CATEGORY",
            "unknown category",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_duplicate_review() {
        assert_error(
            ApiServiceError::DuplicateReview,
            StatusCode::BAD_REQUEST,
            "DUPLICATE_REVIEW",
            "review already exists",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_missing_data() {
        assert_error(
            ApiServiceError::MissingData,
            StatusCode::BAD_REQUEST,
            "MISSING_DATA",
            "missing data",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_invalid_confirmation_code() {
        assert_error(
            ApiServiceError::InvalidConfirmationCode,
            StatusCode::UNAUTHORIZED,
            "INVALID_CONFIRMATION_CODE",
            "invalid confirmation code",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_forbidden() {
        assert_error(
            ApiServiceError::Forbidden,
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
            "forbidden",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_internal() {
        assert_error(
            ApiServiceError::Internal(anyhow::anyhow!("db error")),
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL",
            "internal error",
        )
        .await;
    }
}
