use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use painel_domain::money::Money;
use painel_domain::sale::SaleStatus;
use painel_domain::user::UserRole;

/// Stored account. `password_hash` is an argon2 PHC string and never leaves the service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub oauth_provider: Option<String>,
    pub oauth_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub oauth_provider: Option<String>,
    pub oauth_id: Option<String>,
}

/// Partial user update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub avatar: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
            && self.avatar.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub category: String,
    pub stock: i32,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub category: String,
    pub stock: i32,
    pub image: Option<String>,
}

/// Partial product update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub category: Option<String>,
    pub stock: Option<i32>,
    pub image: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.stock.is_none()
            && self.image.is_none()
    }
}

/// A sale joined with the names of its product and buyer.
///
/// References are `None` once the product or user has been deleted.
#[derive(Debug, Clone)]
pub struct SaleView {
    pub id: i32,
    pub product_id: Option<i32>,
    pub user_id: Option<i32>,
    pub total: Money,
    pub status: SaleStatus,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub product_name: Option<String>,
    pub product_category: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewSale {
    pub product_id: i32,
    pub user_id: i32,
    pub total: Money,
    /// Product price at sale time, recorded on the line item.
    pub unit_price: Money,
    pub status: SaleStatus,
    pub payment_method: Option<String>,
}

/// Partial sale update. Only bookkeeping fields may change after a sale is recorded.
#[derive(Debug, Clone, Default)]
pub struct SalePatch {
    pub status: Option<SaleStatus>,
    pub payment_method: Option<String>,
}

impl SalePatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.payment_method.is_none()
    }
}

/// Upper end of a sale date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Until {
    /// Strictly before the instant; a bare end date resolves to the following midnight.
    Before(DateTime<Utc>),
    /// At or before the instant.
    Through(DateTime<Utc>),
}

impl Until {
    pub fn admits(self, at: DateTime<Utc>) -> bool {
        match self {
            Self::Before(end) => at < end,
            Self::Through(end) => at <= end,
        }
    }

    /// Whether no instant at or after `from` can satisfy this bound.
    pub fn precedes(self, from: DateTime<Utc>) -> bool {
        match self {
            Self::Before(end) => end <= from,
            Self::Through(end) => end < from,
        }
    }
}

/// Sale date range starting at `from` (inclusive) plus an optional row limit.
#[derive(Debug, Clone, Default)]
pub struct SaleFilter {
    pub from: Option<DateTime<Utc>>,
    pub until: Option<Until>,
    pub limit: Option<u64>,
}

// ── OAuth ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Github,
    Facebook,
}

impl OAuthProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
            Self::Facebook => "facebook",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "github" => Ok(Self::Github),
            "facebook" => Ok(Self::Facebook),
            other => Err(format!("unsupported oauth provider: {other}")),
        }
    }
}

/// Profile confirmed by the provider for a given access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthIdentity {
    pub provider: OAuthProvider,
    pub id: String,
    /// Only set when the provider vouches for the address.
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Trim and drop blank optional text.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
