use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::{Value, json};

use painel_auth_types::token::validate_access_token;
use painel_domain::user::UserRole;
use painel_testing::auth::TEST_JWT_SECRET;

use crate::helpers::{ADMIN_EMAIL, PASSWORD, USER_EMAIL, USER_ID, spawn_app, user};

// ── POST /api/auth/login ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_login_with_seeded_credentials() {
    let app = spawn_app().await;

    let resp = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": USER_EMAIL, "password": PASSWORD }))
        .await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], USER_EMAIL);
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());

    let info = validate_access_token(body["token"].as_str().unwrap(), TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, USER_ID);
    assert_eq!(info.role, UserRole::User);
}

#[tokio::test]
async fn should_reject_wrong_password_with_401() {
    let app = spawn_app().await;

    let resp = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": ADMIN_EMAIL, "password": "nope-nope" }))
        .await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = resp.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "INVALID_CREDENTIALS");
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn should_reject_malformed_json_with_400() {
    let app = spawn_app().await;

    let resp = app
        .server
        .post("/api/auth/login")
        .bytes(Bytes::from_static(b"{not json"))
        .content_type("application/json")
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["kind"], "VALIDATION");
}

// ── POST /api/auth/register ──────────────────────────────────────────────────

#[tokio::test]
async fn should_register_new_user_as_plain_user() {
    let app = spawn_app().await;

    let resp = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "name": "João", "email": "joao@example.com", "password": PASSWORD }))
        .await;

    resp.assert_status(StatusCode::CREATED);
    let body: Value = resp.json();
    assert_eq!(body["user"]["name"], "João");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let login = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "joao@example.com", "password": PASSWORD }))
        .await;
    login.assert_status_ok();
}

#[tokio::test]
async fn should_reject_duplicate_email_on_register() {
    let app = spawn_app().await;

    let resp = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "name": "Outra", "email": USER_EMAIL, "password": PASSWORD }))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["kind"], "EMAIL_IN_USE");

    let login = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": USER_EMAIL, "password": PASSWORD }))
        .await;
    login.assert_status_ok();
    assert_eq!(login.json::<Value>()["user"]["name"], "Maria");
}

#[tokio::test]
async fn should_reject_unknown_oauth_provider() {
    let app = spawn_app().await;

    let resp = app
        .server
        .post("/api/auth/oauth")
        .json(&json!({ "provider": "myspace", "token": "abc" }))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
}

// ── /api/profile ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_401_without_token() {
    let app = spawn_app().await;

    let resp = app.server.get("/api/profile").await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(resp.json::<Value>()["kind"], "MISSING_TOKEN");
}

#[tokio::test]
async fn should_return_401_for_garbage_token() {
    let app = spawn_app().await;

    let resp = app
        .server
        .get("/api/profile")
        .authorization_bearer("not-a-jwt")
        .await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_update_own_profile() {
    let app = spawn_app().await;
    let (name, value) = user().header();

    let resp = app
        .server
        .put("/api/profile")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "name": "Maria Souza" }))
        .await;
    resp.assert_status_ok();
    assert_eq!(resp.json::<Value>()["user"]["name"], "Maria Souza");

    let profile = app.server.get("/api/profile").add_header(name, value).await;
    profile.assert_status_ok();
    let body: Value = profile.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["name"], "Maria Souza");
    assert_eq!(body["user"]["email"], USER_EMAIL);
}

// ── Health / fallback ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_health_and_readiness() {
    let app = spawn_app().await;

    app.server.get("/health").await.assert_status_ok();
    app.server.get("/readyz").await.assert_status_ok();
}

#[tokio::test]
async fn should_return_404_envelope_for_unknown_route() {
    let app = spawn_app().await;

    let resp = app.server.get("/api/nowhere").await;

    resp.assert_status(StatusCode::NOT_FOUND);
    let body: Value = resp.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "ROUTE_NOT_FOUND");
}
