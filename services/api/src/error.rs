use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::DbErr;

use painel_auth_types::token::AuthError;

/// API error variants. Every variant renders the `{success, kind, message}` envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("no fields to update")]
    MissingData,
    #[error("email already in use")]
    EmailInUse,
    #[error("product out of stock")]
    OutOfStock,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid oauth token")]
    InvalidOAuthToken,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("user not found")]
    UserNotFound,
    #[error("product not found")]
    ProductNotFound,
    #[error("sale not found")]
    SaleNotFound,
    #[error("product has sales and cannot be deleted")]
    ProductHasSales,
    #[error("cannot remove the last admin")]
    LastAdmin,
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True when an internal error was caused by the database being unreachable.
    fn is_unavailable(&self) -> bool {
        match self {
            Self::Internal(e) => matches!(
                e.downcast_ref::<DbErr>(),
                Some(DbErr::ConnectionAcquire(_) | DbErr::Conn(_))
            ),
            _ => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::MissingData => "MISSING_DATA",
            Self::EmailInUse => "EMAIL_IN_USE",
            Self::OutOfStock => "OUT_OF_STOCK",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidOAuthToken => "INVALID_OAUTH_TOKEN",
            Self::Auth(e) => e.kind(),
            Self::Forbidden(_) => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::SaleNotFound => "SALE_NOT_FOUND",
            Self::ProductHasSales => "PRODUCT_HAS_SALES",
            Self::LastAdmin => "LAST_ADMIN",
            Self::Internal(_) if self.is_unavailable() => "DATABASE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MissingData | Self::EmailInUse | Self::OutOfStock => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials | Self::InvalidOAuthToken => StatusCode::UNAUTHORIZED,
            Self::Auth(e) => e.status(),
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::UserNotFound | Self::ProductNotFound | Self::SaleNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::ProductHasSales | Self::LastAdmin => StatusCode::CONFLICT,
            Self::Internal(_) if self.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = (self.status(), self.kind());
        // 4xx are recorded by the trace layer; only server faults are logged here.
        let detail = match &self {
            Self::Internal(e) => {
                let chain = format!("{e:#}");
                tracing::error!(error = %chain, kind, "internal error");
                Some(chain)
            }
            _ => None,
        };
        let message = if status == StatusCode::SERVICE_UNAVAILABLE {
            "database unavailable".to_owned()
        } else {
            self.to_string()
        };
        painel_core::error::error_response(status, kind, &message, detail)
    }
}
