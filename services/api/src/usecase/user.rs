use painel_domain::user::UserRole;

use crate::domain::repository::{PasswordHasher, UserRepository};
use crate::domain::types::{NewUser, User, UserPatch, non_blank};
use crate::error::ApiError;
use crate::usecase::{require, require_email, require_password};

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<User>, ApiError> {
        self.repo.list().await
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: i32) -> Result<User, ApiError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>,
    pub avatar: Option<String>,
}

pub struct CreateUserUseCase<R: UserRepository, H: PasswordHasher> {
    pub repo: R,
    pub hasher: H,
}

impl<R: UserRepository, H: PasswordHasher> CreateUserUseCase<R, H> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, ApiError> {
        let name = require(input.name, "name")?;
        let email = require_email(input.email)?;
        require_password(&input.password)?;
        if self.repo.email_taken(&email, None).await? {
            return Err(ApiError::EmailInUse);
        }
        let password_hash = self.hasher.hash(&input.password).await?;
        self.repo
            .create(&NewUser {
                name,
                email,
                password_hash,
                role: input.role.unwrap_or_default(),
                avatar: non_blank(input.avatar),
                oauth_provider: None,
                oauth_id: None,
            })
            .await
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

/// Requested changes to an account. `None` keeps the current value.
#[derive(Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub avatar: Option<String>,
}

/// Validate `changes` for user `id` and turn them into a storable patch.
///
/// Shared by the admin update and the self-service profile edit.
pub(crate) async fn prepare_patch<R: UserRepository, H: PasswordHasher>(
    repo: &R,
    hasher: &H,
    id: i32,
    changes: UserChanges,
) -> Result<UserPatch, ApiError> {
    let name = changes.name.map(|n| require(n, "name")).transpose()?;
    let email = changes.email.map(require_email).transpose()?;
    if let Some(ref email) = email {
        if repo.email_taken(email, Some(id)).await? {
            return Err(ApiError::EmailInUse);
        }
    }
    let password_hash = match changes.password {
        Some(password) => {
            require_password(&password)?;
            Some(hasher.hash(&password).await?)
        }
        None => None,
    };
    let patch = UserPatch {
        name,
        email,
        password_hash,
        role: changes.role,
        avatar: non_blank(changes.avatar),
    };
    if patch.is_empty() {
        return Err(ApiError::MissingData);
    }
    Ok(patch)
}

pub struct UpdateUserUseCase<R: UserRepository, H: PasswordHasher> {
    pub repo: R,
    pub hasher: H,
}

impl<R: UserRepository, H: PasswordHasher> UpdateUserUseCase<R, H> {
    pub async fn execute(&self, user_id: i32, changes: UserChanges) -> Result<User, ApiError> {
        let current = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let patch = prepare_patch(&self.repo, &self.hasher, user_id, changes).await?;
        let demotes_admin = current.role.is_admin() && patch.role == Some(UserRole::User);
        if demotes_admin && self.repo.count_admins().await? <= 1 {
            return Err(ApiError::LastAdmin);
        }
        self.repo.update(user_id, &patch).await
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    pub async fn execute(&self, user_id: i32) -> Result<(), ApiError> {
        let target = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        if target.role.is_admin() && self.repo.count_admins().await? <= 1 {
            return Err(ApiError::LastAdmin);
        }
        if !self.repo.delete(user_id).await? {
            return Err(ApiError::UserNotFound);
        }
        tracing::info!(user_id, "user deleted");
        Ok(())
    }
}
