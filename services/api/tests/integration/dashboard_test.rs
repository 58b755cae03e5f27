use axum::http::StatusCode;
use serde_json::Value;

use crate::helpers::{create_product, create_sale, spawn_app, user};

#[tokio::test]
async fn should_return_empty_metrics_shape() {
    let app = spawn_app().await;
    let (name, value) = user().header();

    let resp = app
        .server
        .get("/api/dashboard/metrics")
        .add_header(name, value)
        .await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    for key in ["revenue", "users", "orders", "avgTicket"] {
        assert!(body["kpis"][key]["value"].is_string(), "missing kpi {key}");
        assert!(body["kpis"][key]["trend"]["isPositive"].is_boolean());
    }
    assert_eq!(body["kpis"]["orders"]["value"], "0");
    assert!(body["salesData"].is_array());
    assert!(body["categoryData"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn should_aggregate_recorded_sales() {
    let app = spawn_app().await;
    let widget = create_product(&app, "Widget", "Gadgets", 10.0, 5).await;
    let mug = create_product(&app, "Caneca", "Casa", 15.0, 5).await;
    create_sale(&app, widget, 10.0).await.assert_status(StatusCode::CREATED);
    create_sale(&app, widget, 10.0).await.assert_status(StatusCode::CREATED);
    create_sale(&app, mug, 15.0).await.assert_status(StatusCode::CREATED);
    let (name, value) = user().header();

    let kpis: Value = app
        .server
        .get("/api/dashboard/kpis")
        .add_query_param("period", "week")
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(kpis["orders"]["value"], "3");
    assert_eq!(kpis["users"]["value"], "1");
    assert_eq!(kpis["orders"]["trend"]["value"], 100.0);

    let categories: Vec<Value> = app
        .server
        .get("/api/dashboard/categories")
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(categories.len(), 2);
    let casa = categories.iter().find(|c| c["label"] == "Casa").unwrap();
    assert_eq!(casa["value"], 15.0);

    let top: Vec<Value> = app
        .server
        .get("/api/dashboard/products")
        .add_query_param("limit", "1")
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["name"], "Widget");
    assert_eq!(top[0]["sales"], 2);

    let transactions: Vec<Value> = app
        .server
        .get("/api/dashboard/transactions")
        .add_header(name, value)
        .await
        .json();
    assert_eq!(transactions.len(), 3);
    assert_eq!(transactions[0]["product"], "Caneca");
    assert_eq!(transactions[0]["customer"], "Maria");
}

#[tokio::test]
async fn should_require_auth_for_dashboard() {
    let app = spawn_app().await;

    app.server
        .get("/api/dashboard/kpis")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
