use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use painel_auth_types::identity::{AdminContext, AuthContext};
use painel_domain::money::Money;
use painel_domain::sale::SaleStatus;

use crate::domain::types::SaleView;
use crate::error::ApiError;
use crate::handlers::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;
use crate::usecase::sale::{
    CreateSaleInput, CreateSaleUseCase, DeleteSaleUseCase, GetSaleUseCase, ListSalesInput,
    ListSalesUseCase, UpdateSaleInput, UpdateSaleUseCase,
};

#[derive(Serialize)]
pub struct SaleResponse {
    pub id: i32,
    pub product_id: Option<i32>,
    pub user_id: Option<i32>,
    pub value: Money,
    pub status: SaleStatus,
    pub payment_method: Option<String>,
    #[serde(serialize_with = "painel_core::serde::to_rfc3339_ms")]
    pub date: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "painel_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub product_name: Option<String>,
    pub product_category: Option<String>,
    pub user_name: Option<String>,
}

impl From<SaleView> for SaleResponse {
    fn from(s: SaleView) -> Self {
        Self {
            id: s.id,
            product_id: s.product_id,
            user_id: s.user_id,
            value: s.total,
            status: s.status,
            payment_method: s.payment_method,
            date: s.created_at,
            updated_at: s.updated_at,
            product_name: s.product_name,
            product_category: s.product_category,
            user_name: s.user_name,
        }
    }
}

fn parse_status(raw: Option<String>) -> Result<Option<SaleStatus>, ApiError> {
    raw.map(|s| s.parse::<SaleStatus>())
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))
}

// ── GET /api/sales ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListSalesQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub async fn list_sales(
    _auth: AuthContext,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListSalesQuery>,
) -> Result<Json<Vec<SaleResponse>>, ApiError> {
    let usecase = ListSalesUseCase {
        sales: state.sale_repo(),
    };
    let sales = usecase
        .execute(ListSalesInput {
            start_date: query.start_date,
            end_date: query.end_date,
        })
        .await?;
    Ok(Json(sales.into_iter().map(SaleResponse::from).collect()))
}

// ── GET /api/sales/{id} ──────────────────────────────────────────────────────

pub async fn get_sale(
    _auth: AuthContext,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<SaleResponse>, ApiError> {
    let usecase = GetSaleUseCase {
        sales: state.sale_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── POST /api/sales ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateSaleRequest {
    pub product_id: Option<i32>,
    pub user_id: Option<i32>,
    #[serde(alias = "total")]
    pub value: Option<Money>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
}

pub async fn create_sale(
    auth: AuthContext,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateSaleRequest>,
) -> Result<(StatusCode, Json<SaleResponse>), ApiError> {
    let (Some(product_id), Some(user_id), Some(value)) = (body.product_id, body.user_id, body.value)
    else {
        return Err(ApiError::validation(
            "product_id, user_id and value are required",
        ));
    };
    let usecase = CreateSaleUseCase {
        products: state.product_repo(),
        users: state.user_repo(),
        sales: state.sale_repo(),
    };
    let sale = usecase
        .execute(
            &auth,
            CreateSaleInput {
                product_id,
                user_id,
                value,
                status: parse_status(body.status)?,
                payment_method: body.payment_method,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(sale.into())))
}

// ── PUT /api/sales/{id} ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateSaleRequest {
    pub status: Option<String>,
    pub payment_method: Option<String>,
}

pub async fn update_sale(
    _admin: AdminContext,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<UpdateSaleRequest>,
) -> Result<Json<SaleResponse>, ApiError> {
    let usecase = UpdateSaleUseCase {
        sales: state.sale_repo(),
    };
    let sale = usecase
        .execute(
            id,
            UpdateSaleInput {
                status: parse_status(body.status)?,
                payment_method: body.payment_method,
            },
        )
        .await?;
    Ok(Json(sale.into()))
}

// ── DELETE /api/sales/{id} ───────────────────────────────────────────────────

pub async fn delete_sale(
    _admin: AdminContext,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteSaleUseCase {
        sales: state.sale_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
