use chrono::Utc;
use rand::RngExt;
use serde_json::json;
use uuid::Uuid;

use critiq_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::{
    CONFIRMATION_CODE_LEN, OutboxEvent, User, validate_email, validate_username,
};
use crate::error::ApiServiceError;

/// Charset for generating confirmation codes (uppercase alphanumeric).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CONFIRMATION_CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

fn confirmation_event(email: &str, username: &str, code: &str) -> OutboxEvent {
    let id = Uuid::new_v4();
    OutboxEvent {
        id,
        kind: "confirmation_code_issued".to_owned(),
        payload: json!({ "email": email, "username": username, "code": code }),
        idempotency_key: format!("confirmation_code_issued:{id}"),
    }
}

pub struct SignUpInput {
    pub username: String,
    pub email: String,
}

pub struct SignUpUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> SignUpUseCase<R> {
    /// Register a new account or rotate the code for an existing one.
    ///
    /// Re-signup with the exact (username, email) pair of an existing user
    /// rotates that user's confirmation code. A request matching only one
    /// half of the pair is a conflict.
    pub async fn execute(&self, input: SignUpInput) -> Result<(), ApiServiceError> {
        if !validate_username(&input.username) {
            return Err(ApiServiceError::InvalidUsername);
        }
        if !validate_email(&input.email) {
            return Err(ApiServiceError::InvalidEmail);
        }

        let by_username = self.repo.find_by_username(&input.username).await?;
        let by_email = self.repo.find_by_email(&input.email).await?;

        match (by_username, by_email) {
            (Some(existing), Some(same)) if existing.id == same.id => {
                let code = generate_code();
                let event = confirmation_event(&existing.email, &existing.username, &code);
                self.repo
                    .set_confirmation_code(existing.id, &code, &event)
                    .await
            }
            (None, None) => {
                let code = generate_code();
                let now = Utc::now();
                let user = User {
                    id: Uuid::now_v7(),
                    username: input.username,
                    email: input.email,
                    first_name: None,
                    last_name: None,
                    bio: None,
                    role: UserRole::User,
                    is_superuser: false,
                    confirmation_code: Some(code.clone()),
                    created_at: now,
                    updated_at: now,
                };
                let event = confirmation_event(&user.email, &user.username, &code);
                self.repo.create_with_outbox(&user, &event).await
            }
            _ => Err(ApiServiceError::UserAlreadyExists),
        }
    }
}
