use painel_domain::money::Money;

use crate::domain::repository::ProductRepository;
use crate::domain::types::{NewProduct, Product, ProductPatch, non_blank};
use crate::error::ApiError;
use crate::usecase::require;

fn check_price(price: Money) -> Result<Money, ApiError> {
    if price.is_negative() {
        return Err(ApiError::validation("price must not be negative"));
    }
    Ok(price)
}

fn check_stock(stock: i32) -> Result<i32, ApiError> {
    if stock < 0 {
        return Err(ApiError::validation("stock must not be negative"));
    }
    Ok(stock)
}

// ── ListProducts ─────────────────────────────────────────────────────────────

pub struct ListProductsUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> ListProductsUseCase<R> {
    pub async fn execute(&self, category: Option<String>) -> Result<Vec<Product>, ApiError> {
        let category = non_blank(category);
        self.repo.list(category.as_deref()).await
    }
}

// ── GetProduct ───────────────────────────────────────────────────────────────

pub struct GetProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> GetProductUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<Product, ApiError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::ProductNotFound)
    }
}

// ── CreateProduct ────────────────────────────────────────────────────────────

pub struct CreateProductInput {
    pub name: String,
    pub category: String,
    pub price: Money,
    pub stock: Option<i32>,
    pub description: Option<String>,
    pub image: Option<String>,
}

pub struct CreateProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> CreateProductUseCase<R> {
    pub async fn execute(&self, input: CreateProductInput) -> Result<Product, ApiError> {
        let product = NewProduct {
            name: require(input.name, "name")?,
            category: require(input.category, "category")?,
            price: check_price(input.price)?,
            stock: check_stock(input.stock.unwrap_or(0))?,
            description: non_blank(input.description),
            image: non_blank(input.image),
        };
        let created = self.repo.create(&product).await?;
        tracing::info!(product_id = created.id, "product created");
        Ok(created)
    }
}

// ── UpdateProduct ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Money>,
    pub stock: Option<i32>,
    pub description: Option<String>,
    pub image: Option<String>,
}

pub struct UpdateProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> UpdateProductUseCase<R> {
    pub async fn execute(&self, id: i32, input: UpdateProductInput) -> Result<Product, ApiError> {
        let patch = ProductPatch {
            name: input.name.map(|n| require(n, "name")).transpose()?,
            category: input.category.map(|c| require(c, "category")).transpose()?,
            price: input.price.map(check_price).transpose()?,
            stock: input.stock.map(check_stock).transpose()?,
            description: non_blank(input.description),
            image: non_blank(input.image),
        };
        if patch.is_empty() {
            return Err(ApiError::MissingData);
        }
        self.repo.update(id, &patch).await
    }
}

// ── DeleteProduct ────────────────────────────────────────────────────────────

pub struct DeleteProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> DeleteProductUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<(), ApiError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(ApiError::ProductNotFound);
        }
        if self.repo.count_sales(id).await? > 0 {
            return Err(ApiError::ProductHasSales);
        }
        if !self.repo.delete(id).await? {
            return Err(ApiError::ProductNotFound);
        }
        tracing::info!(product_id = id, "product deleted");
        Ok(())
    }
}
