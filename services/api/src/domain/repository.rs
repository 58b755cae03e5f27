#![allow(async_fn_in_trait)]

use painel_domain::metrics::SaleFact;
use painel_domain::period::Window;

use crate::domain::types::{
    NewProduct, NewSale, NewUser, OAuthIdentity, OAuthProvider, Product, ProductPatch, SaleFilter,
    SalePatch, SaleView, User, UserPatch,
};
use crate::error::ApiError;

/// Repository for accounts.
pub trait UserRepository: Send + Sync {
    /// All users, newest first.
    async fn list(&self) -> Result<Vec<User>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_oauth(
        &self,
        provider: OAuthProvider,
        oauth_id: &str,
    ) -> Result<Option<User>, ApiError>;
    /// Whether another user (other than `except`) already owns `email`.
    async fn email_taken(&self, email: &str, except: Option<i32>) -> Result<bool, ApiError>;
    async fn count_admins(&self) -> Result<u64, ApiError>;
    /// Insert a user. A unique violation on email maps to [`ApiError::EmailInUse`].
    async fn create(&self, user: &NewUser) -> Result<User, ApiError>;
    /// Apply a patch. Missing rows map to [`ApiError::UserNotFound`].
    async fn update(&self, id: i32, patch: &UserPatch) -> Result<User, ApiError>;
    /// Attach an OAuth identity to an existing account, keeping any avatar it already has.
    async fn link_oauth(&self, id: i32, identity: &OAuthIdentity) -> Result<User, ApiError>;
    /// Delete a user. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

/// Repository for catalog products.
pub trait ProductRepository: Send + Sync {
    /// Products newest first, optionally restricted to one category.
    async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ApiError>;
    async fn create(&self, product: &NewProduct) -> Result<Product, ApiError>;
    /// Apply a patch. Missing rows map to [`ApiError::ProductNotFound`].
    async fn update(&self, id: i32, patch: &ProductPatch) -> Result<Product, ApiError>;
    async fn count_sales(&self, id: i32) -> Result<u64, ApiError>;
    /// Delete a product. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

/// Repository for sales.
pub trait SaleRepository: Send + Sync {
    /// Sales newest first within the filter's date range.
    async fn list(&self, filter: &SaleFilter) -> Result<Vec<SaleView>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<SaleView>, ApiError>;
    /// Record a sale and take one unit out of stock, atomically.
    ///
    /// Fails with [`ApiError::OutOfStock`], leaving nothing written, when the product has no
    /// stock left at commit time.
    async fn create_with_stock_decrement(&self, sale: &NewSale) -> Result<SaleView, ApiError>;
    /// Apply a patch. Missing rows map to [`ApiError::SaleNotFound`].
    async fn update(&self, id: i32, patch: &SalePatch) -> Result<SaleView, ApiError>;
    /// Delete a sale. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

/// Read model feeding the dashboard.
pub trait SalesAnalyticsPort: Send + Sync {
    /// Every sale dated inside `window`, joined with its product.
    async fn facts(&self, window: &Window) -> Result<Vec<SaleFact>, ApiError>;
    /// The latest `limit` sales dated inside `window`.
    async fn recent(&self, window: &Window, limit: u64) -> Result<Vec<SaleView>, ApiError>;
}

/// One-way password hashing. Implementations keep CPU-heavy work off the async workers.
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, ApiError>;
    async fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Confirms an OAuth access token with its provider.
pub trait OAuthVerifier: Send + Sync {
    async fn verify(
        &self,
        provider: OAuthProvider,
        access_token: &str,
    ) -> Result<OAuthIdentity, ApiError>;
}
