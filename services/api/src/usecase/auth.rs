use anyhow::Context as _;
use uuid::Uuid;

use painel_auth_types::token::issue_access_token;
use painel_domain::user::UserRole;

use crate::domain::repository::{OAuthVerifier, PasswordHasher, UserRepository};
use crate::domain::types::{NewUser, OAuthIdentity, OAuthProvider, User, non_blank};
use crate::error::ApiError;
use crate::usecase::user::{UserChanges, prepare_patch};
use crate::usecase::{require, require_email, require_password};

/// A signed-in user and their access token.
pub struct AuthOutput {
    pub user: User,
    pub token: String,
}

fn sign_in(user: User, secret: &str) -> Result<AuthOutput, ApiError> {
    let (token, _exp) =
        issue_access_token(user.id, user.role, secret).context("sign access token")?;
    Ok(AuthOutput { user, token })
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<R: UserRepository, H: PasswordHasher> {
    pub users: R,
    pub hasher: H,
    pub jwt_secret: String,
}

impl<R: UserRepository, H: PasswordHasher> LoginUseCase<R, H> {
    pub async fn execute(&self, input: LoginInput) -> Result<AuthOutput, ApiError> {
        let email = require(input.email, "email")?;
        require_password(&input.password)?;
        // Unknown email and wrong password are indistinguishable to the caller.
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;
        if !self.hasher.verify(&input.password, &user.password_hash).await {
            return Err(ApiError::InvalidCredentials);
        }
        sign_in(user, &self.jwt_secret)
    }
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct RegisterUseCase<R: UserRepository, H: PasswordHasher> {
    pub users: R,
    pub hasher: H,
    pub jwt_secret: String,
}

impl<R: UserRepository, H: PasswordHasher> RegisterUseCase<R, H> {
    pub async fn execute(&self, input: RegisterInput) -> Result<AuthOutput, ApiError> {
        let name = require(input.name, "name")?;
        let email = require_email(input.email)?;
        require_password(&input.password)?;
        if self.users.email_taken(&email, None).await? {
            return Err(ApiError::EmailInUse);
        }
        let password_hash = self.hasher.hash(&input.password).await?;
        let user = self
            .users
            .create(&NewUser {
                name,
                email,
                password_hash,
                role: UserRole::User,
                avatar: None,
                oauth_provider: None,
                oauth_id: None,
            })
            .await?;
        tracing::info!(user_id = user.id, "user registered");
        sign_in(user, &self.jwt_secret)
    }
}

// ── OAuth login ──────────────────────────────────────────────────────────────

/// Profile fields the client read from the provider. Only used to cross-check the
/// verified identity and to fill gaps the provider leaves (e.g. a display name).
#[derive(Default)]
pub struct ClaimedProfile {
    pub id: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

pub struct OAuthLoginInput {
    pub provider: String,
    pub access_token: String,
    pub profile: Option<ClaimedProfile>,
}

pub struct OAuthLoginUseCase<R: UserRepository, H: PasswordHasher, V: OAuthVerifier> {
    pub users: R,
    pub hasher: H,
    pub verifier: V,
    pub jwt_secret: String,
}

fn placeholder_email(provider: OAuthProvider, id: &str) -> String {
    format!("{provider}_{id}@oauth.invalid")
}

impl<R: UserRepository, H: PasswordHasher, V: OAuthVerifier> OAuthLoginUseCase<R, H, V> {
    pub async fn execute(&self, input: OAuthLoginInput) -> Result<AuthOutput, ApiError> {
        let provider: OAuthProvider = input.provider.parse().map_err(ApiError::Validation)?;
        let access_token = require(input.access_token, "token")?;
        let identity = self.verifier.verify(provider, &access_token).await?;

        let claimed = input.profile.unwrap_or_default();
        if let Some(claimed_id) = non_blank(claimed.id) {
            if claimed_id != identity.id {
                tracing::warn!(%provider, "oauth profile id does not match verified token");
                return Err(ApiError::InvalidOAuthToken);
            }
        }

        let user = match self.users.find_by_oauth(provider, &identity.id).await? {
            Some(user) => user,
            None => match self.find_by_verified_email(&identity).await? {
                Some(user) if user.oauth_provider.is_none() || user.oauth_id.is_none() => {
                    tracing::info!(user_id = user.id, %provider, "linking oauth identity");
                    self.users.link_oauth(user.id, &identity).await?
                }
                Some(user) => user,
                None => {
                    self.create_from_identity(identity, claimed.name, claimed.picture)
                        .await?
                }
            },
        };
        sign_in(user, &self.jwt_secret)
    }

    async fn find_by_verified_email(
        &self,
        identity: &OAuthIdentity,
    ) -> Result<Option<User>, ApiError> {
        match identity.email.as_deref() {
            Some(email) => self.users.find_by_email(email).await,
            None => Ok(None),
        }
    }

    async fn create_from_identity(
        &self,
        identity: OAuthIdentity,
        claimed_name: Option<String>,
        claimed_picture: Option<String>,
    ) -> Result<User, ApiError> {
        let email = identity
            .email
            .clone()
            .unwrap_or_else(|| placeholder_email(identity.provider, &identity.id));
        let name = non_blank(identity.name.clone())
            .or_else(|| non_blank(claimed_name))
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_owned());
        // OAuth accounts get a random password nobody knows.
        let password_hash = self.hasher.hash(&Uuid::new_v4().to_string()).await?;
        let user = self
            .users
            .create(&NewUser {
                name,
                email,
                password_hash,
                role: UserRole::User,
                avatar: identity.picture.clone().or_else(|| non_blank(claimed_picture)),
                oauth_provider: Some(identity.provider.as_str().to_owned()),
                oauth_id: Some(identity.id),
            })
            .await?;
        tracing::info!(user_id = user.id, provider = %identity.provider, "oauth user created");
        Ok(user)
    }
}

// ── Profile ──────────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> GetProfileUseCase<R> {
    pub async fn execute(&self, user_id: i32) -> Result<User, ApiError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

pub struct UpdateProfileUseCase<R: UserRepository, H: PasswordHasher> {
    pub users: R,
    pub hasher: H,
}

impl<R: UserRepository, H: PasswordHasher> UpdateProfileUseCase<R, H> {
    pub async fn execute(&self, user_id: i32, input: UpdateProfileInput) -> Result<User, ApiError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ApiError::UserNotFound);
        }
        let changes = UserChanges {
            name: input.name,
            email: input.email,
            password: input.password,
            role: None,
            avatar: input.avatar,
        };
        let patch = prepare_patch(&self.users, &self.hasher, user_id, changes).await?;
        self.users.update(user_id, &patch).await
    }
}
