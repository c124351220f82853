use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::warn;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::transaction::models::TransactionType;

/// Per-category sum as returned by the grouping query
#[derive(Debug, Clone, FromRow)]
pub struct CategorySumRow {
    pub category_id: Uuid,
    pub total_amount: Decimal,
}

/// Total income for a period
#[derive(Debug, Serialize, ToSchema)]
pub struct IncomeResponse {
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 150000.0)]
    pub total_income: Decimal,
}

/// Total expense for a period
#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseResponse {
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 50000.0)]
    pub total_expense: Decimal,
}

/// Income minus expense for a period
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 100000.0)]
    pub balance: Decimal,
}

/// Income, expense and balance of one calendar month
#[derive(Debug, Serialize, ToSchema)]
pub struct MonthlySummary {
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: u32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 100000.0)]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 40000.0)]
    pub total_expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 60000.0)]
    pub balance: Decimal,
}

impl MonthlySummary {
    pub fn from_totals(year: i32, month: u32, income: Decimal, expense: Decimal) -> Self {
        Self {
            year,
            month,
            total_income: income,
            total_expense: expense,
            balance: income - expense,
        }
    }
}

/// Sum of one category within a breakdown
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryTotal {
    #[schema(example = "Groceries")]
    pub category: String,
    #[serde(rename = "totalAmount", with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 30000.0)]
    pub total_amount: Decimal,
}

/// Category breakdown ("chart") response
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryBreakdownResponse {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub data: Vec<CategoryTotal>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthlySummaryQuery {
    #[param(example = 2025)]
    pub year: Option<i32>,
    #[param(example = 3)]
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CategoryBreakdownQuery {
    /// Transaction type: Pemasukan or Pengeluaran
    #[serde(rename = "type")]
    #[param(example = "Pengeluaran")]
    pub transaction_type: Option<String>,
    #[param(example = 2025)]
    pub year: Option<i32>,
    /// Optional; without it the whole year is grouped
    #[param(example = 3)]
    pub month: Option<u32>,
}

/// Attach category names to grouped sums, sorted by category name.
/// Rows whose category disappeared between the two lookups are dropped.
pub fn label_groups(rows: Vec<CategorySumRow>, names: &HashMap<Uuid, String>) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = rows
        .into_iter()
        .filter_map(|row| match names.get(&row.category_id) {
            Some(name) => Some(CategoryTotal {
                category: name.clone(),
                total_amount: row.total_amount,
            }),
            None => {
                warn!(category_id = %row.category_id, "Grouped category has no name, skipping");
                None
            }
        })
        .collect();

    totals.sort_by(|a, b| a.category.cmp(&b.category));
    totals
}
