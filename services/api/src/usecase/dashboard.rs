use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use painel_domain::metrics::{
    SaleFact, Trend, WindowTotals, daily_revenue, product_sales, revenue_by_category,
};
use painel_domain::money::Money;
use painel_domain::period::Period;
use painel_domain::sale::SaleStatus;

use crate::domain::repository::SalesAnalyticsPort;
use crate::error::ApiError;

pub const DEFAULT_TOP_PRODUCTS: u64 = 5;
pub const DEFAULT_TRANSACTIONS: u64 = 10;
const MAX_ROWS: u64 = 50;

/// Clamp a requested row count into `1..=50`.
pub fn clamp_limit(limit: Option<u64>, default: u64) -> u64 {
    limit.unwrap_or(default).clamp(1, MAX_ROWS)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub value: String,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub revenue: KpiSnapshot,
    pub users: KpiSnapshot,
    pub orders: KpiSnapshot,
    pub avg_ticket: KpiSnapshot,
}

impl Kpis {
    fn compare(current: &WindowTotals, previous: &WindowTotals) -> Self {
        let current_ticket = current.average_ticket();
        let previous_ticket = previous.average_ticket();
        Self {
            revenue: KpiSnapshot {
                value: current.revenue.to_brl(),
                trend: Trend::between(current.revenue.to_decimal(), previous.revenue.to_decimal()),
            },
            users: KpiSnapshot {
                value: current.customers.to_string(),
                trend: Trend::between(current.customers as f64, previous.customers as f64),
            },
            orders: KpiSnapshot {
                value: current.orders.to_string(),
                trend: Trend::between(current.orders as f64, previous.orders as f64),
            },
            avg_ticket: KpiSnapshot {
                value: current_ticket.to_brl(),
                trend: Trend::between(current_ticket.to_decimal(), previous_ticket.to_decimal()),
            },
        }
    }
}

/// One chart bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub kpis: Kpis,
    pub sales_data: Vec<ChartPoint>,
    pub category_data: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopProduct {
    pub id: i32,
    pub name: String,
    pub sales: u64,
    pub revenue: String,
    pub growth: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: i32,
    pub customer: Option<String>,
    pub product: Option<String>,
    pub amount: String,
    #[serde(serialize_with = "painel_core::serde::to_rfc3339_ms")]
    pub date: DateTime<Utc>,
    pub status: SaleStatus,
}

fn sales_series(facts: &[SaleFact]) -> Vec<ChartPoint> {
    daily_revenue(facts)
        .into_iter()
        .map(|(day, value)| ChartPoint {
            label: day.format("%Y-%m-%d").to_string(),
            value,
        })
        .collect()
}

fn category_series(facts: &[SaleFact]) -> Vec<ChartPoint> {
    revenue_by_category(facts)
        .into_iter()
        .map(|(label, value)| ChartPoint { label, value })
        .collect()
}

/// Facts of the current window and the one right before it.
struct Windows {
    current: Vec<SaleFact>,
    previous: Vec<SaleFact>,
}

pub struct DashboardUseCase<A: SalesAnalyticsPort> {
    pub analytics: A,
}

impl<A: SalesAnalyticsPort> DashboardUseCase<A> {
    async fn load(&self, period: Period, now: DateTime<Utc>) -> Result<Windows, ApiError> {
        let current_window = period.current(now);
        let previous_window = period.previous(now);
        let (current, previous) = tokio::try_join!(
            self.analytics.facts(&current_window),
            self.analytics.facts(&previous_window),
        )?;
        Ok(Windows { current, previous })
    }

    pub async fn metrics(
        &self,
        period: Period,
        now: DateTime<Utc>,
    ) -> Result<DashboardMetrics, ApiError> {
        let windows = self.load(period, now).await?;
        Ok(DashboardMetrics {
            kpis: Kpis::compare(
                &WindowTotals::from_facts(&windows.current),
                &WindowTotals::from_facts(&windows.previous),
            ),
            sales_data: sales_series(&windows.current),
            category_data: category_series(&windows.current),
        })
    }

    pub async fn kpis(&self, period: Period, now: DateTime<Utc>) -> Result<Kpis, ApiError> {
        let windows = self.load(period, now).await?;
        Ok(Kpis::compare(
            &WindowTotals::from_facts(&windows.current),
            &WindowTotals::from_facts(&windows.previous),
        ))
    }

    pub async fn sales(
        &self,
        period: Period,
        now: DateTime<Utc>,
    ) -> Result<Vec<ChartPoint>, ApiError> {
        let facts = self.analytics.facts(&period.current(now)).await?;
        Ok(sales_series(&facts))
    }

    pub async fn categories(
        &self,
        period: Period,
        now: DateTime<Utc>,
    ) -> Result<Vec<ChartPoint>, ApiError> {
        let facts = self.analytics.facts(&period.current(now)).await?;
        Ok(category_series(&facts))
    }

    pub async fn top_products(
        &self,
        period: Period,
        now: DateTime<Utc>,
        limit: Option<u64>,
    ) -> Result<Vec<TopProduct>, ApiError> {
        let limit = clamp_limit(limit, DEFAULT_TOP_PRODUCTS) as usize;
        let windows = self.load(period, now).await?;
        let before: HashMap<i32, Money> = product_sales(&windows.previous)
            .into_iter()
            .map(|p| (p.product_id, p.revenue))
            .collect();
        Ok(product_sales(&windows.current)
            .into_iter()
            .take(limit)
            .map(|p| {
                let previous = before.get(&p.product_id).copied().unwrap_or_default();
                TopProduct {
                    id: p.product_id,
                    name: p.name,
                    sales: p.units,
                    revenue: p.revenue.to_brl(),
                    growth: Trend::between(p.revenue.to_decimal(), previous.to_decimal()),
                }
            })
            .collect())
    }

    pub async fn transactions(
        &self,
        period: Period,
        now: DateTime<Utc>,
        limit: Option<u64>,
    ) -> Result<Vec<Transaction>, ApiError> {
        let limit = clamp_limit(limit, DEFAULT_TRANSACTIONS);
        let recent = self.analytics.recent(&period.current(now), limit).await?;
        Ok(recent
            .into_iter()
            .map(|sale| Transaction {
                id: sale.id,
                customer: sale.user_name,
                product: sale.product_name,
                amount: sale.total.to_brl(),
                date: sale.created_at,
                status: sale.status,
            })
            .collect())
    }
}
