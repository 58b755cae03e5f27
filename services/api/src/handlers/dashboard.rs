use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;

use painel_auth_types::identity::AuthContext;
use painel_domain::period::Period;

use crate::error::ApiError;
use crate::handlers::extract::ApiQuery;
use crate::infra::db::DbSalesAnalytics;
use crate::state::AppState;
use crate::usecase::dashboard::{
    ChartPoint, DashboardMetrics, DashboardUseCase, Kpis, TopProduct, Transaction,
};

/// `?period=week|month|year&limit=N`. Unknown periods fall back to a month.
#[derive(Deserialize)]
pub struct DashboardQuery {
    pub period: Option<String>,
    pub limit: Option<u64>,
}

impl DashboardQuery {
    fn period(&self) -> Period {
        Period::from_token(self.period.as_deref())
    }
}

fn usecase(state: &AppState) -> DashboardUseCase<DbSalesAnalytics> {
    DashboardUseCase {
        analytics: state.analytics(),
    }
}

// ── GET /api/dashboard/metrics ───────────────────────────────────────────────

pub async fn get_metrics(
    _auth: AuthContext,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> Result<Json<DashboardMetrics>, ApiError> {
    let metrics = usecase(&state).metrics(query.period(), Utc::now()).await?;
    Ok(Json(metrics))
}

// ── GET /api/dashboard/kpis ──────────────────────────────────────────────────

pub async fn get_kpis(
    _auth: AuthContext,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> Result<Json<Kpis>, ApiError> {
    Ok(Json(usecase(&state).kpis(query.period(), Utc::now()).await?))
}

// ── GET /api/dashboard/sales ─────────────────────────────────────────────────

pub async fn get_sales_series(
    _auth: AuthContext,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> Result<Json<Vec<ChartPoint>>, ApiError> {
    Ok(Json(usecase(&state).sales(query.period(), Utc::now()).await?))
}

// ── GET /api/dashboard/categories ────────────────────────────────────────────

pub async fn get_categories(
    _auth: AuthContext,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> Result<Json<Vec<ChartPoint>>, ApiError> {
    Ok(Json(
        usecase(&state)
            .categories(query.period(), Utc::now())
            .await?,
    ))
}

// ── GET /api/dashboard/transactions ──────────────────────────────────────────

pub async fn get_transactions(
    _auth: AuthContext,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let rows = usecase(&state)
        .transactions(query.period(), Utc::now(), query.limit)
        .await?;
    Ok(Json(rows))
}

// ── GET /api/dashboard/products ──────────────────────────────────────────────

pub async fn get_top_products(
    _auth: AuthContext,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> Result<Json<Vec<TopProduct>>, ApiError> {
    let rows = usecase(&state)
        .top_products(query.period(), Utc::now(), query.limit)
        .await?;
    Ok(Json(rows))
}
