use critiq_auth_types::token::issue_access_token;

use crate::domain::repository::UserRepository;
use crate::error::ApiServiceError;

pub struct CreateTokenInput {
    pub username: String,
    pub confirmation_code: String,
}

#[derive(Debug)]
pub struct CreateTokenOutput {
    pub access_token: String,
}

pub struct CreateTokenUseCase<R: UserRepository> {
    pub repo: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> CreateTokenUseCase<R> {
    /// Exchange a confirmation code for an access token.
    ///
    /// An unknown username is a 404; a known username with a wrong or
    /// absent code is a 401. The code stays valid until the next signup
    /// rotates it.
    pub async fn execute(
        &self,
        input: CreateTokenInput,
    ) -> Result<CreateTokenOutput, ApiServiceError> {
        let user = self
            .repo
            .find_by_username(&input.username)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;

        let matches = user
            .confirmation_code
            .as_deref()
            .is_some_and(|code| code == input.confirmation_code);
        if !matches {
            return Err(ApiServiceError::InvalidConfirmationCode);
        }

        let access_token =
            issue_access_token(user.id, user.role, user.is_superuser, &self.jwt_secret)
                .map_err(|e| ApiServiceError::Internal(e.into()))?;

        Ok(CreateTokenOutput { access_token })
    }
}
