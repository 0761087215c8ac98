use chrono::Utc;
use uuid::Uuid;

use critiq_domain::pagination::PageRequest;
use critiq_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::{User, validate_email, validate_username};
use crate::error::ApiServiceError;

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Vec<User>, ApiServiceError> {
        self.repo.list(search.as_deref(), page).await
    }
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: UserRole,
}

pub struct CreateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, ApiServiceError> {
        if !validate_username(&input.username) {
            return Err(ApiServiceError::InvalidUsername);
        }
        if !validate_email(&input.email) {
            return Err(ApiServiceError::InvalidEmail);
        }
        if self.repo.find_by_username(&input.username).await?.is_some()
            || self.repo.find_by_email(&input.email).await?.is_some()
        {
            return Err(ApiServiceError::UserAlreadyExists);
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username: input.username,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            bio: input.bio,
            role: input.role,
            is_superuser: false,
            confirmation_code: None,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&user).await?;
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, username: &str) -> Result<User, ApiServiceError> {
        self.repo
            .find_by_username(username)
            .await?
            .ok_or(ApiServiceError::UserNotFound)
    }
}

// ── GetMe ────────────────────────────────────────────────────────────────────

pub struct GetMeUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetMeUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, ApiServiceError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<UserRole>,
}

impl UpdateUserInput {
    fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.bio.is_none()
            && self.role.is_none()
    }

    fn apply(self, user: &mut User) -> Result<(), ApiServiceError> {
        if let Some(username) = self.username {
            if !validate_username(&username) {
                return Err(ApiServiceError::InvalidUsername);
            }
            user.username = username;
        }
        if let Some(email) = self.email {
            if !validate_email(&email) {
                return Err(ApiServiceError::InvalidEmail);
            }
            user.email = email;
        }
        if let Some(first_name) = self.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = self.last_name {
            user.last_name = Some(last_name);
        }
        if let Some(bio) = self.bio {
            user.bio = Some(bio);
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        user.updated_at = Utc::now();
        Ok(())
    }
}

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(
        &self,
        username: &str,
        input: UpdateUserInput,
    ) -> Result<User, ApiServiceError> {
        if input.is_empty() {
            return Err(ApiServiceError::MissingData);
        }
        let mut user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;
        input.apply(&mut user)?;
        self.repo.update(&user).await?;
        Ok(user)
    }
}

// ── UpdateMe ─────────────────────────────────────────────────────────────────

pub struct UpdateMeUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateMeUseCase<R> {
    /// Self-service profile update. The role field is stripped by the
    /// handler, so a caller can never escalate through this path.
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateUserInput,
    ) -> Result<User, ApiServiceError> {
        if input.is_empty() {
            return Err(ApiServiceError::MissingData);
        }
        let mut user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;
        input.apply(&mut user)?;
        self.repo.update(&user).await?;
        Ok(user)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    pub async fn execute(&self, username: &str) -> Result<(), ApiServiceError> {
        if self.repo.delete_by_username(username).await? {
            Ok(())
        } else {
            Err(ApiServiceError::UserNotFound)
        }
    }
}
