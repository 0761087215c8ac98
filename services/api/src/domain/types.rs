use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use critiq_domain::user::UserRole;

/// User account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: UserRole,
    pub is_superuser: bool,
    /// Signup confirmation code. Rotated on re-signup, never consumed.
    pub confirmation_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog category (a title belongs to at most one).
#[derive(Debug, Clone)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

/// Catalog genre (a title carries any number).
#[derive(Debug, Clone)]
pub struct Genre {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

/// A reviewable work.
#[derive(Debug, Clone)]
pub struct Title {
    pub id: i32,
    pub name: String,
    pub year: i16,
    pub description: Option<String>,
    pub category_id: Option<i32>,
}

/// A title with its resolved references and aggregated rating,
/// as returned by read endpoints.
#[derive(Debug, Clone)]
pub struct TitleDetail {
    pub title: Title,
    pub category: Option<Category>,
    pub genres: Vec<Genre>,
    /// Mean review score. `None` when the title has no reviews.
    pub rating: Option<f64>,
}

/// A review of a title. At most one per (title, author).
#[derive(Debug, Clone)]
pub struct Review {
    pub id: i32,
    pub title_id: i32,
    pub author_id: Uuid,
    pub author_username: String,
    pub text: String,
    pub score: i16,
    pub pub_date: DateTime<Utc>,
}

/// A comment on a review.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: i32,
    pub review_id: i32,
    pub author_id: Uuid,
    pub author_username: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

/// Fields for creating a title. Genre and category slugs are resolved to
/// ids by the usecase before this reaches the repository.
#[derive(Debug, Clone)]
pub struct TitleDraft {
    pub name: String,
    pub year: i16,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub genre_ids: Vec<i32>,
}

/// Fields for creating a review.
#[derive(Debug, Clone)]
pub struct ReviewDraft {
    pub title_id: i32,
    pub author_id: Uuid,
    pub text: String,
    pub score: i16,
}

/// Fields for creating a comment.
#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub review_id: i32,
    pub author_id: Uuid,
    pub text: String,
}

/// Outbox event for async delivery (e.g. confirmation-code email).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// Filters for the title listing. Absent fields impose no constraint;
/// present fields AND-combine.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    /// Case-insensitive substring match on name.
    pub name: Option<String>,
    pub year: Option<i16>,
    /// Exact genre slug.
    pub genre: Option<String>,
    /// Exact category slug.
    pub category: Option<String>,
}

impl TitleFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.year.is_none() && self.genre.is_none() && self.category.is_none()
    }
}

/// Confirmation code length in characters.
pub const CONFIRMATION_CODE_LEN: usize = 12;

/// Review score bounds, inclusive.
pub const SCORE_MIN: i16 = 1;
pub const SCORE_MAX: i16 = 10;

const USERNAME_MAX_LEN: usize = 150;
const EMAIL_MAX_LEN: usize = 254;
const SLUG_MAX_LEN: usize = 50;
const NAME_MAX_LEN: usize = 256;

/// Validate a username: 1-150 chars of `[A-Za-z0-9_.@+-]`.
/// Reserved: "me". Rejects names starting with '@' (collides with the
/// `/users/@me` route).
pub fn validate_username(username: &str) -> bool {
    if username.is_empty() || username.len() > USERNAME_MAX_LEN {
        return false;
    }
    if username == "me" {
        return false;
    }
    if username.starts_with('@') {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'))
}

/// Validate an email address: non-empty local and domain parts around a
/// single '@', ≤ 254 chars, no whitespace.
pub fn validate_email(email: &str) -> bool {
    if email.is_empty() || email.len() > EMAIL_MAX_LEN {
        return false;
    }
    if email.chars().any(|c| c.is_ascii_whitespace()) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}

/// Validate a catalog slug: 1-50 chars of `[a-z0-9_-]`.
pub fn validate_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > SLUG_MAX_LEN {
        return false;
    }
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Validate a catalog display name: 1-256 chars.
pub fn validate_catalog_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= NAME_MAX_LEN
}

/// Validate a review score against the closed interval [1, 10].
pub fn validate_score(score: i16) -> bool {
    (SCORE_MIN..=SCORE_MAX).contains(&score)
}

/// Validate a release year: must not be in the future.
pub fn validate_year(year: i16) -> bool {
    i32::from(year) <= Utc::now().year()
}
