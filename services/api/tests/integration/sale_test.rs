use axum::http::StatusCode;
use chrono::{Duration, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use serde_json::{Value, json};

use painel_api_schema::{products, sale_items, sales};

use crate::helpers::{ADMIN_ID, USER_ID, admin, create_product, create_sale, spawn_app, user};

#[tokio::test]
async fn should_record_sale_and_decrement_stock() {
    let app = spawn_app().await;
    let product_id = create_product(&app, "Widget", "Gadgets", 12.5, 2).await;

    let resp = create_sale(&app, product_id, 12.5).await;

    resp.assert_status(StatusCode::CREATED);
    let body: Value = resp.json();
    assert_eq!(body["product_id"], product_id);
    assert_eq!(body["user_id"], USER_ID);
    assert_eq!(body["value"], 12.5);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["product_name"], "Widget");
    assert_eq!(body["product_category"], "Gadgets");
    assert_eq!(body["user_name"], "Maria");

    let product = products::Entity::find_by_id(product_id as i32)
        .one(&app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, 1);
    assert_eq!(sales::Entity::find().count(&app.state.db).await.unwrap(), 1);
    assert_eq!(sale_items::Entity::find().count(&app.state.db).await.unwrap(), 1);
}

#[tokio::test]
async fn should_reject_sale_when_out_of_stock() {
    let app = spawn_app().await;
    let product_id = create_product(&app, "Widget", "Gadgets", 12.5, 0).await;

    let resp = create_sale(&app, product_id, 12.5).await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["kind"], "OUT_OF_STOCK");
    let product = products::Entity::find_by_id(product_id as i32)
        .one(&app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, 0);
    assert_eq!(sales::Entity::find().count(&app.state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn should_stop_selling_once_last_unit_is_gone() {
    let app = spawn_app().await;
    let product_id = create_product(&app, "Widget", "Gadgets", 5.0, 1).await;

    create_sale(&app, product_id, 5.0)
        .await
        .assert_status(StatusCode::CREATED);
    let second = create_sale(&app, product_id, 5.0).await;

    second.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(sales::Entity::find().count(&app.state.db).await.unwrap(), 1);
}

#[tokio::test]
async fn should_require_product_user_and_value() {
    let app = spawn_app().await;
    let (name, value) = user().header();

    let resp = app
        .server
        .post("/api/sales")
        .add_header(name, value)
        .json(&json!({ "user_id": USER_ID }))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.json::<Value>()["message"],
        "product_id, user_id and value are required"
    );
}

#[tokio::test]
async fn should_forbid_recording_sales_for_someone_else() {
    let app = spawn_app().await;
    let product_id = create_product(&app, "Widget", "Gadgets", 5.0, 3).await;
    let (name, value) = user().header();

    let resp = app
        .server
        .post("/api/sales")
        .add_header(name, value)
        .json(&json!({ "product_id": product_id, "user_id": ADMIN_ID, "value": 5.0 }))
        .await;

    resp.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_list_sales_within_date_range() {
    let app = spawn_app().await;
    let product_id = create_product(&app, "Widget", "Gadgets", 5.0, 3).await;
    create_sale(&app, product_id, 5.0)
        .await
        .assert_status(StatusCode::CREATED);
    let (name, value) = user().header();
    let today = Utc::now().date_naive();

    let hit = app
        .server
        .get("/api/sales")
        .add_query_param("start_date", today.to_string())
        .add_query_param("end_date", today.to_string())
        .add_header(name.clone(), value.clone())
        .await;
    hit.assert_status_ok();
    assert_eq!(hit.json::<Vec<Value>>().len(), 1);

    let last_week = today - Duration::days(7);
    let miss = app
        .server
        .get("/api/sales")
        .add_query_param("start_date", last_week.to_string())
        .add_query_param("end_date", (last_week + Duration::days(1)).to_string())
        .add_header(name.clone(), value.clone())
        .await;
    miss.assert_status_ok();
    assert!(miss.json::<Vec<Value>>().is_empty());

    let inverted = app
        .server
        .get("/api/sales")
        .add_query_param("start_date", today.to_string())
        .add_query_param("end_date", last_week.to_string())
        .add_header(name, value)
        .await;
    inverted.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_let_admin_update_and_delete_sale() {
    let app = spawn_app().await;
    let product_id = create_product(&app, "Widget", "Gadgets", 5.0, 3).await;
    let sale_id = create_sale(&app, product_id, 5.0).await.json::<Value>()["id"]
        .as_i64()
        .unwrap();
    let (user_name, user_value) = user().header();
    let (name, value) = admin().header();

    app.server
        .put(&format!("/api/sales/{sale_id}"))
        .add_header(user_name, user_value)
        .json(&json!({ "status": "cancelled" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let updated = app
        .server
        .put(&format!("/api/sales/{sale_id}"))
        .add_header(name.clone(), value.clone())
        .json(&json!({ "status": "cancelled" }))
        .await;
    updated.assert_status_ok();
    assert_eq!(updated.json::<Value>()["status"], "cancelled");

    app.server
        .delete(&format!("/api/sales/{sale_id}"))
        .add_header(name.clone(), value.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.server
        .get(&format!("/api/sales/{sale_id}"))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_include_sale_at_the_end_instant() {
    let app = spawn_app().await;
    let product_id = create_product(&app, "Widget", "Gadgets", 5.0, 3).await;
    let at = Utc.with_ymd_and_hms(2025, 1, 31, 15, 0, 0).unwrap();
    sales::ActiveModel {
        product_id: Set(Some(product_id as i32)),
        user_id: Set(Some(USER_ID)),
        total_cents: Set(500),
        status: Set("completed".to_owned()),
        payment_method: Set(None),
        created_at: Set(at),
        updated_at: Set(at),
        ..Default::default()
    }
    .insert(&app.state.db)
    .await
    .unwrap();
    let (name, value) = user().header();

    let through = app
        .server
        .get("/api/sales")
        .add_query_param("start_date", "2025-01-31T00:00:00Z")
        .add_query_param("end_date", "2025-01-31T15:00:00Z")
        .add_header(name.clone(), value.clone())
        .await;
    through.assert_status_ok();
    assert_eq!(through.json::<Vec<Value>>().len(), 1);

    let same_instant = app
        .server
        .get("/api/sales")
        .add_query_param("start_date", "2025-01-31T15:00:00Z")
        .add_query_param("end_date", "2025-01-31T15:00:00Z")
        .add_header(name.clone(), value.clone())
        .await;
    same_instant.assert_status_ok();
    assert_eq!(same_instant.json::<Vec<Value>>().len(), 1);

    let before = app
        .server
        .get("/api/sales")
        .add_query_param("end_date", "2025-01-31T14:59:59Z")
        .add_header(name, value)
        .await;
    before.assert_status_ok();
    assert!(before.json::<Vec<Value>>().is_empty());
}
