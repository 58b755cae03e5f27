use painel_domain::user::UserRole;

use crate::domain::repository::{PasswordHasher, UserRepository};
use crate::domain::types::NewUser;
use crate::error::ApiError;
use crate::usecase::{require_email, require_password};

// ── EnsureDefaultAdmin ───────────────────────────────────────────────────────

pub struct EnsureDefaultAdminUseCase<R: UserRepository, H: PasswordHasher> {
    pub users: R,
    pub hasher: H,
}

impl<R: UserRepository, H: PasswordHasher> EnsureDefaultAdminUseCase<R, H> {
    /// Create the bootstrap admin unless an account already owns `email`.
    /// Returns `true` when a new account was created.
    pub async fn execute(&self, email: &str, password: &str) -> Result<bool, ApiError> {
        let email = require_email(email.to_owned())?;
        require_password(password)?;
        if self.users.find_by_email(&email).await?.is_some() {
            return Ok(false);
        }
        let password_hash = self.hasher.hash(password).await?;
        self.users
            .create(&NewUser {
                name: "Administrator".to_owned(),
                email,
                password_hash,
                role: UserRole::Admin,
                avatar: None,
                oauth_provider: None,
                oauth_id: None,
            })
            .await?;
        Ok(true)
    }
}
