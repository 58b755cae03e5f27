//! Sales aggregation for the dashboard.
//!
//! Everything here folds a slice of [`SaleFact`]s loaded for one [`Window`](crate::period::Window);
//! no I/O happens in this module.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::money::Money;

/// One sale as seen by the dashboard, joined with its product.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleFact {
    pub sale_id: i32,
    pub user_id: Option<i32>,
    pub product_id: Option<i32>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub total: Money,
    pub created_at: DateTime<Utc>,
}

/// Percentage change between two windows.
///
/// `value` is the absolute change rounded to one decimal; the sign lives in `is_positive`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub value: f64,
    pub is_positive: bool,
}

impl Trend {
    /// A previous value of zero always reports `+100%`, whatever the current value.
    pub fn between(current: f64, previous: f64) -> Self {
        if previous == 0.0 {
            return Self {
                value: 100.0,
                is_positive: true,
            };
        }
        let change = (current - previous) / previous * 100.0;
        Self {
            value: (change.abs() * 10.0).round() / 10.0,
            is_positive: change >= 0.0,
        }
    }
}

/// Headline numbers of one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowTotals {
    pub revenue: Money,
    /// Distinct buyers. Sales whose user was deleted are not counted.
    pub customers: u64,
    pub orders: u64,
}

impl WindowTotals {
    pub fn from_facts(facts: &[SaleFact]) -> Self {
        let customers: HashSet<i32> = facts.iter().filter_map(|f| f.user_id).collect();
        Self {
            revenue: facts.iter().map(|f| f.total).sum(),
            customers: customers.len() as u64,
            orders: facts.len() as u64,
        }
    }

    pub fn average_ticket(&self) -> Money {
        self.revenue.average_over(self.orders)
    }
}

/// Revenue per UTC calendar day, ascending.
pub fn daily_revenue(facts: &[SaleFact]) -> Vec<(NaiveDate, Money)> {
    let mut days: BTreeMap<NaiveDate, Money> = BTreeMap::new();
    for fact in facts {
        *days.entry(fact.created_at.date_naive()).or_default() += fact.total;
    }
    days.into_iter().collect()
}

/// Revenue per product category, highest first (ties by name).
/// Sales whose product no longer exists carry no category and are skipped.
pub fn revenue_by_category(facts: &[SaleFact]) -> Vec<(String, Money)> {
    let mut categories: HashMap<&str, Money> = HashMap::new();
    for fact in facts {
        if let Some(category) = fact.category.as_deref() {
            *categories.entry(category).or_default() += fact.total;
        }
    }
    let mut out: Vec<(String, Money)> = categories
        .into_iter()
        .map(|(name, revenue)| (name.to_owned(), revenue))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Units and revenue of one product within a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSales {
    pub product_id: i32,
    pub name: String,
    pub units: u64,
    pub revenue: Money,
}

/// Per-product totals, highest revenue first (ties by product id).
pub fn product_sales(facts: &[SaleFact]) -> Vec<ProductSales> {
    let mut products: HashMap<i32, ProductSales> = HashMap::new();
    for fact in facts {
        let Some(product_id) = fact.product_id else {
            continue;
        };
        let entry = products.entry(product_id).or_insert_with(|| ProductSales {
            product_id,
            name: fact.product_name.clone().unwrap_or_default(),
            units: 0,
            revenue: Money::ZERO,
        });
        entry.units += 1;
        entry.revenue += fact.total;
    }
    let mut out: Vec<ProductSales> = products.into_values().collect();
    out.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    out
}
