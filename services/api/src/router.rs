use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use painel_core::error::route_not_found;
use painel_core::health::health;
use painel_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::{get_profile, login, oauth_login, register, update_profile},
    dashboard::{
        get_categories, get_kpis, get_metrics, get_sales_series, get_top_products,
        get_transactions,
    },
    health::readyz,
    product::{create_product, delete_product, get_product, list_products, update_product},
    sale::{create_sale, delete_sale, get_sale, list_sales, update_sale},
    user::{create_user, delete_user, get_user, list_users, update_user},
};
use crate::state::AppState;

/// CORS for the dashboard front end: one origin, credentials allowed.
pub fn cors_layer(frontend_url: &str) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = frontend_url
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid FRONTEND_URL {frontend_url:?}: {e}"))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/oauth", post(oauth_login))
        .route("/profile", get(get_profile).put(update_profile))
        // Dashboard
        .route("/dashboard/metrics", get(get_metrics))
        .route("/dashboard/kpis", get(get_kpis))
        .route("/dashboard/sales", get(get_sales_series))
        .route("/dashboard/categories", get(get_categories))
        .route("/dashboard/transactions", get(get_transactions))
        .route("/dashboard/products", get(get_top_products))
        // Users
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        // Products
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        // Sales
        .route("/sales", get(list_sales).post(create_sale))
        .route(
            "/sales/{id}",
            get(get_sale).put(update_sale).delete(delete_sale),
        )
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health))
        .route("/readyz", get(readyz))
        .nest("/api", api_routes())
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
