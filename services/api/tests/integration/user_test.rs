use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::helpers::{ADMIN_ID, PASSWORD, USER_ID, admin, spawn_app, user};

#[tokio::test]
async fn should_list_users_for_admin_only() {
    let app = spawn_app().await;
    let (name, value) = admin().header();

    let resp = app.server.get("/api/users").add_header(name, value).await;
    resp.assert_status_ok();
    let body: Vec<Value> = resp.json();
    assert_eq!(body.len(), 2);
    assert!(body.iter().all(|u| u.get("password_hash").is_none()));

    let (name, value) = user().header();
    let denied = app.server.get("/api/users").add_header(name, value).await;
    denied.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_create_user_with_role_alias() {
    let app = spawn_app().await;
    let (name, value) = admin().header();

    let resp = app
        .server
        .post("/api/users")
        .add_header(name, value)
        .json(&json!({
            "name": "Carla",
            "email": "carla@example.com",
            "password": PASSWORD,
            "type": "admin",
        }))
        .await;

    resp.assert_status(StatusCode::CREATED);
    let body: Value = resp.json();
    assert_eq!(body["role"], "admin");
    assert_eq!(body["email"], "carla@example.com");
}

#[tokio::test]
async fn should_reject_empty_user_update() {
    let app = spawn_app().await;
    let (name, value) = admin().header();

    let resp = app
        .server
        .put(&format!("/api/users/{USER_ID}"))
        .add_header(name, value)
        .json(&json!({}))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["kind"], "MISSING_DATA");
}

#[tokio::test]
async fn should_protect_last_admin() {
    let app = spawn_app().await;
    let (name, value) = admin().header();

    let delete = app
        .server
        .delete(&format!("/api/users/{ADMIN_ID}"))
        .add_header(name.clone(), value.clone())
        .await;
    delete.assert_status(StatusCode::CONFLICT);
    assert_eq!(delete.json::<Value>()["kind"], "LAST_ADMIN");

    let demote = app
        .server
        .put(&format!("/api/users/{ADMIN_ID}"))
        .add_header(name, value)
        .json(&json!({ "role": "user" }))
        .await;
    demote.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn should_delete_plain_user() {
    let app = spawn_app().await;
    let (name, value) = admin().header();

    app.server
        .delete(&format!("/api/users/{USER_ID}"))
        .add_header(name.clone(), value.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let gone = app
        .server
        .get(&format!("/api/users/{USER_ID}"))
        .add_header(name, value)
        .await;
    gone.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(gone.json::<Value>()["kind"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn should_delete_admin_when_another_remains() {
    let app = spawn_app().await;
    let (name, value) = admin().header();
    let second = app
        .server
        .post("/api/users")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "name": "Carla",
            "email": "carla@example.com",
            "password": PASSWORD,
            "role": "admin",
        }))
        .await
        .json::<Value>()["id"]
        .as_i64()
        .unwrap();

    app.server
        .delete(&format!("/api/users/{second}"))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NO_CONTENT);
}
