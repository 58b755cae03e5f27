use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

use painel_auth_types::identity::AuthContext;
use painel_domain::money::Money;
use painel_domain::sale::SaleStatus;

use crate::domain::repository::{ProductRepository, SaleRepository, UserRepository};
use crate::domain::types::{NewSale, SaleFilter, SalePatch, SaleView, Until, non_blank};
use crate::error::ApiError;

// ── ListSales ────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct ListSalesInput {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// A range bound as the caller wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateInput {
    Instant(DateTime<Utc>),
    Day(NaiveDate),
}

/// Parse `YYYY-MM-DD` or an RFC 3339 instant.
fn parse_date(raw: &str, field: &str) -> Result<DateInput, ApiError> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(DateInput::Instant(at.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(DateInput::Day)
        .map_err(|_| {
            ApiError::validation(format!("{field} must be YYYY-MM-DD or an RFC 3339 timestamp"))
        })
}

fn midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

fn start_bound(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    Ok(match parse_date(raw, "start_date")? {
        DateInput::Instant(at) => at,
        DateInput::Day(day) => midnight(day),
    })
}

/// An end instant is inclusive; a bare end date covers that whole UTC day.
fn end_bound(raw: &str) -> Result<Until, ApiError> {
    match parse_date(raw, "end_date")? {
        DateInput::Instant(at) => Ok(Until::Through(at)),
        DateInput::Day(day) => day
            .checked_add_days(Days::new(1))
            .map(|next| Until::Before(midnight(next)))
            .ok_or_else(|| ApiError::validation("end_date is out of range")),
    }
}

pub struct ListSalesUseCase<S: SaleRepository> {
    pub sales: S,
}

impl<S: SaleRepository> ListSalesUseCase<S> {
    pub async fn execute(&self, input: ListSalesInput) -> Result<Vec<SaleView>, ApiError> {
        let from = non_blank(input.start_date)
            .map(|raw| start_bound(&raw))
            .transpose()?;
        let until = non_blank(input.end_date)
            .map(|raw| end_bound(&raw))
            .transpose()?;
        if let (Some(from), Some(until)) = (from, until) {
            if until.precedes(from) {
                return Err(ApiError::validation("start_date must not be after end_date"));
            }
        }
        self.sales
            .list(&SaleFilter {
                from,
                until,
                limit: None,
            })
            .await
    }
}

// ── GetSale ──────────────────────────────────────────────────────────────────

pub struct GetSaleUseCase<S: SaleRepository> {
    pub sales: S,
}

impl<S: SaleRepository> GetSaleUseCase<S> {
    pub async fn execute(&self, id: i32) -> Result<SaleView, ApiError> {
        self.sales
            .find_by_id(id)
            .await?
            .ok_or(ApiError::SaleNotFound)
    }
}

// ── CreateSale ───────────────────────────────────────────────────────────────

pub struct CreateSaleInput {
    pub product_id: i32,
    pub user_id: i32,
    pub value: Money,
    pub status: Option<SaleStatus>,
    pub payment_method: Option<String>,
}

pub struct CreateSaleUseCase<P: ProductRepository, U: UserRepository, S: SaleRepository> {
    pub products: P,
    pub users: U,
    pub sales: S,
}

impl<P: ProductRepository, U: UserRepository, S: SaleRepository> CreateSaleUseCase<P, U, S> {
    pub async fn execute(
        &self,
        caller: &AuthContext,
        input: CreateSaleInput,
    ) -> Result<SaleView, ApiError> {
        if !input.value.is_positive() {
            return Err(ApiError::validation("value must be greater than zero"));
        }
        if !caller.is_admin() && caller.user_id != input.user_id {
            return Err(ApiError::Forbidden("sales can only be recorded for yourself"));
        }
        let product = self
            .products
            .find_by_id(input.product_id)
            .await?
            .ok_or(ApiError::ProductNotFound)?;
        if product.stock <= 0 {
            return Err(ApiError::OutOfStock);
        }
        if self.users.find_by_id(input.user_id).await?.is_none() {
            return Err(ApiError::UserNotFound);
        }
        // The stock check above is advisory; the repository re-checks it under the transaction.
        let sale = self
            .sales
            .create_with_stock_decrement(&NewSale {
                product_id: product.id,
                user_id: input.user_id,
                total: input.value,
                unit_price: product.price,
                status: input.status.unwrap_or_default(),
                payment_method: non_blank(input.payment_method),
            })
            .await?;
        tracing::info!(sale_id = sale.id, product_id = product.id, "sale recorded");
        Ok(sale)
    }
}

// ── UpdateSale ───────────────────────────────────────────────────────────────

pub struct UpdateSaleInput {
    pub status: Option<SaleStatus>,
    pub payment_method: Option<String>,
}

pub struct UpdateSaleUseCase<S: SaleRepository> {
    pub sales: S,
}

impl<S: SaleRepository> UpdateSaleUseCase<S> {
    pub async fn execute(&self, id: i32, input: UpdateSaleInput) -> Result<SaleView, ApiError> {
        let patch = SalePatch {
            status: input.status,
            payment_method: non_blank(input.payment_method),
        };
        if patch.is_empty() {
            return Err(ApiError::MissingData);
        }
        self.sales.update(id, &patch).await
    }
}

// ── DeleteSale ───────────────────────────────────────────────────────────────

pub struct DeleteSaleUseCase<S: SaleRepository> {
    pub sales: S,
}

impl<S: SaleRepository> DeleteSaleUseCase<S> {
    pub async fn execute(&self, id: i32) -> Result<(), ApiError> {
        if !self.sales.delete(id).await? {
            return Err(ApiError::SaleNotFound);
        }
        Ok(())
    }
}
