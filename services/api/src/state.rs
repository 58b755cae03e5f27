use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use painel_auth_types::identity::JwtSecret;

use crate::infra::db::{DbProductRepository, DbSaleRepository, DbSalesAnalytics, DbUserRepository};
use crate::infra::oauth::HttpOAuthVerifier;
use crate::infra::password::Argon2Hasher;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: JwtSecret,
    pub oauth: HttpOAuthVerifier,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn product_repo(&self) -> DbProductRepository {
        DbProductRepository {
            db: self.db.clone(),
        }
    }

    pub fn sale_repo(&self) -> DbSaleRepository {
        DbSaleRepository {
            db: self.db.clone(),
        }
    }

    pub fn analytics(&self) -> DbSalesAnalytics {
        DbSalesAnalytics {
            db: self.db.clone(),
        }
    }

    pub fn hasher(&self) -> Argon2Hasher {
        Argon2Hasher
    }

    pub fn secret(&self) -> String {
        self.jwt_secret.as_str().to_owned()
    }
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_secret.clone()
    }
}
