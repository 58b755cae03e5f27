use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use painel_auth_types::identity::{AdminContext, AuthContext};
use painel_domain::money::Money;

use crate::domain::types::Product;
use crate::error::ApiError;
use crate::handlers::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;
use crate::usecase::product::{
    CreateProductInput, CreateProductUseCase, DeleteProductUseCase, GetProductUseCase,
    ListProductsUseCase, UpdateProductInput, UpdateProductUseCase,
};

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub category: String,
    pub stock: i32,
    pub image: Option<String>,
    #[serde(serialize_with = "painel_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "painel_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            category: p.category,
            stock: p.stock,
            image: p.image,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// ── GET /api/products ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListProductsQuery {
    pub category: Option<String>,
}

pub async fn list_products(
    _auth: AuthContext,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListProductsQuery>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let usecase = ListProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase.execute(query.category).await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

// ── GET /api/products/{id} ───────────────────────────────────────────────────

pub async fn get_product(
    _auth: AuthContext,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ProductResponse>, ApiError> {
    let usecase = GetProductUseCase {
        repo: state.product_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── POST /api/products ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub price: Option<Money>,
    pub stock: Option<i32>,
    pub description: Option<String>,
    pub image: Option<String>,
}

pub async fn create_product(
    _admin: AdminContext,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let price = body
        .price
        .ok_or_else(|| ApiError::validation("price is required"))?;
    let usecase = CreateProductUseCase {
        repo: state.product_repo(),
    };
    let product = usecase
        .execute(CreateProductInput {
            name: body.name,
            category: body.category,
            price,
            stock: body.stock,
            description: body.description,
            image: body.image,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

// ── PUT /api/products/{id} ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Money>,
    pub stock: Option<i32>,
    pub description: Option<String>,
    pub image: Option<String>,
}

pub async fn update_product(
    _admin: AdminContext,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let usecase = UpdateProductUseCase {
        repo: state.product_repo(),
    };
    let product = usecase
        .execute(
            id,
            UpdateProductInput {
                name: body.name,
                category: body.category,
                price: body.price,
                stock: body.stock,
                description: body.description,
                image: body.image,
            },
        )
        .await?;
    Ok(Json(product.into()))
}

// ── DELETE /api/products/{id} ────────────────────────────────────────────────

pub async fn delete_product(
    _admin: AdminContext,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteProductUseCase {
        repo: state.product_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
