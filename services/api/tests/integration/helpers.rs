use axum_test::TestServer;
use serde_json::{Value, json};

use painel_api::domain::repository::{PasswordHasher, UserRepository};
use painel_api::domain::types::NewUser;
use painel_api::infra::db::DbUserRepository;
use painel_api::infra::oauth::HttpOAuthVerifier;
use painel_api::infra::password::Argon2Hasher;
use painel_api::router::build_router;
use painel_api::state::AppState;
use painel_api_migration::{Migrator, MigratorTrait};
use painel_auth_types::identity::JwtSecret;
use painel_domain::user::UserRole;
use painel_testing::auth::{MockAuth, TEST_JWT_SECRET};
use painel_testing::db::memory_database;

pub const ADMIN_ID: i32 = 1;
pub const USER_ID: i32 = 2;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const USER_EMAIL: &str = "maria@example.com";
pub const PASSWORD: &str = "secret123";

// ── TestApp ──────────────────────────────────────────────────────────────────

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

/// Router over a migrated in-memory database holding one admin (id 1) and one user (id 2).
pub async fn spawn_app() -> TestApp {
    let db = memory_database().await;
    Migrator::up(&db, None).await.unwrap();

    let state = AppState {
        db,
        jwt_secret: JwtSecret::new(TEST_JWT_SECRET),
        oauth: HttpOAuthVerifier::new().unwrap(),
    };

    seed_user(&state, "Admin", ADMIN_EMAIL, UserRole::Admin).await;
    seed_user(&state, "Maria", USER_EMAIL, UserRole::User).await;

    let server = TestServer::new(build_router(state.clone())).unwrap();
    TestApp { server, state }
}

async fn seed_user(state: &AppState, name: &str, email: &str, role: UserRole) {
    let repo = DbUserRepository {
        db: state.db.clone(),
    };
    repo.create(&NewUser {
        name: name.to_owned(),
        email: email.to_owned(),
        password_hash: Argon2Hasher.hash(PASSWORD).await.unwrap(),
        role,
        avatar: None,
        oauth_provider: None,
        oauth_id: None,
    })
    .await
    .unwrap();
}

// ── Fixture helpers ──────────────────────────────────────────────────────────

pub fn admin() -> MockAuth {
    MockAuth::admin(ADMIN_ID)
}

pub fn user() -> MockAuth {
    MockAuth::user(USER_ID)
}

/// Create a product through the API and return its id.
pub async fn create_product(app: &TestApp, name: &str, category: &str, price: f64, stock: i32) -> i64 {
    let (name_header, value) = admin().header();
    let resp = app
        .server
        .post("/api/products")
        .add_header(name_header, value)
        .json(&json!({
            "name": name,
            "category": category,
            "price": price,
            "stock": stock,
        }))
        .await;
    resp.assert_status(axum::http::StatusCode::CREATED);
    resp.json::<Value>()["id"].as_i64().unwrap()
}

/// Record a sale for the seeded user through the API.
pub async fn create_sale(app: &TestApp, product_id: i64, value: f64) -> axum_test::TestResponse {
    let (name, header) = user().header();
    app.server
        .post("/api/sales")
        .add_header(name, header)
        .json(&json!({
            "product_id": product_id,
            "user_id": USER_ID,
            "value": value,
            "payment_method": "pix",
        }))
        .await
}
