//! Mock auth helpers for integration tests.
//!
//! Protected routes expect `Authorization: Bearer <jwt>`. `MockAuth` signs a real token
//! with the test secret so requests pass the production extractors unchanged.

use axum::http::{HeaderName, HeaderValue, header::AUTHORIZATION};

use painel_auth_types::token::issue_access_token;
use painel_domain::user::UserRole;

/// Secret shared by test routers and `MockAuth` tokens.
pub const TEST_JWT_SECRET: &str = "painel-test-secret";

/// Configurable identity attached to test requests.
pub struct MockAuth {
    pub user_id: i32,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: i32, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn admin(user_id: i32) -> Self {
        Self::new(user_id, UserRole::Admin)
    }

    pub fn user(user_id: i32) -> Self {
        Self::new(user_id, UserRole::User)
    }

    /// A token signed with [`TEST_JWT_SECRET`].
    pub fn token(&self) -> String {
        issue_access_token(self.user_id, self.role, TEST_JWT_SECRET)
            .expect("sign test token")
            .0
    }

    /// `Authorization` header as a (name, value) pair.
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        let value = HeaderValue::from_str(&format!("Bearer {}", self.token()))
            .expect("bearer header value");
        (AUTHORIZATION, value)
    }
}
