//! Bearer-token identity extractors.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use painel_domain::user::UserRole;

use crate::token::{AuthError, validate_access_token};

/// HMAC secret used to sign and verify access tokens.
///
/// Extractors read it from router state through [`FromRef`].
#[derive(Clone)]
pub struct JwtSecret(Arc<str>);

impl JwtSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JwtSecret(..)")
    }
}

/// Authenticated caller resolved from `Authorization: Bearer <jwt>`.
///
/// Rejects with 401 when the header is absent, not a bearer credential, or the token
/// fails validation. Role checks are left to [`AdminContext`] or the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i32,
    pub role: UserRole,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// An [`AuthContext`] whose role is admin. Rejects other callers with 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminContext(pub AuthContext);

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat)?;
    let (scheme, token) = value.split_once(' ').ok_or(AuthError::InvalidFormat)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::InvalidFormat);
    }
    Ok(token)
}

fn authenticate(parts: &Parts, secret: &JwtSecret) -> Result<AuthContext, AuthError> {
    let token = bearer_token(&parts.headers)?;
    let info = validate_access_token(token, secret.as_str())?;
    Ok(AuthContext {
        user_id: info.user_id,
        role: info.role,
    })
}

impl<S> FromRequestParts<S> for AuthContext
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    // axum-core 0.5 declares `fn -> impl Future + Send`; resolve synchronously and
    // hand back a 'static future so no borrow of `parts` crosses the await.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = authenticate(parts, &JwtSecret::from_ref(state));
        async move { result }
    }
}

impl<S> FromRequestParts<S> for AdminContext
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = authenticate(parts, &JwtSecret::from_ref(state)).and_then(|ctx| {
            if ctx.is_admin() {
                Ok(AdminContext(ctx))
            } else {
                Err(AuthError::Forbidden)
            }
        });
        async move { result }
    }
}
