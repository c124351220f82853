use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::aggregation::AggregationService;
use super::models::{CategoryBreakdownResponse, MonthlySummary};
use crate::errors::AppError;
use crate::period::{DateInterval, PeriodSelector};
use crate::transaction::models::TransactionType;

/// Reports composed from the aggregation queries
pub struct ReportService;

impl ReportService {
    /// Total of one transaction type inside the selected period
    pub async fn total(
        pool: &PgPool,
        user_id: Uuid,
        selector: PeriodSelector,
        transaction_type: TransactionType,
    ) -> Result<Decimal, AppError> {
        let interval = selector.interval()?;
        AggregationService::sum_by_period_and_type(pool, user_id, interval, transaction_type).await
    }

    /// Income minus expense; both sums run concurrently
    pub async fn net_balance(
        pool: &PgPool,
        user_id: Uuid,
        selector: PeriodSelector,
    ) -> Result<Decimal, AppError> {
        let interval = selector.interval()?;

        let (income, expense) = Self::income_and_expense(pool, user_id, interval).await?;

        Ok(income - expense)
    }

    /// Income, expense and balance of one month
    pub async fn monthly_summary(
        pool: &PgPool,
        user_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<MonthlySummary, AppError> {
        let interval = PeriodSelector::month(year, month)?.interval()?;

        let (income, expense) = Self::income_and_expense(pool, user_id, interval).await?;

        Ok(MonthlySummary::from_totals(year, month, income, expense))
    }

    /// Per-category totals of one type over a month or a whole year
    pub async fn category_breakdown(
        pool: &PgPool,
        user_id: Uuid,
        selector: PeriodSelector,
        transaction_type: TransactionType,
    ) -> Result<CategoryBreakdownResponse, AppError> {
        let interval = selector.interval()?;
        let data =
            AggregationService::grouped_by_category(pool, user_id, interval, transaction_type)
                .await?;

        Ok(CategoryBreakdownResponse {
            transaction_type,
            data,
        })
    }

    /// Both sums of a window, fetched concurrently. Either failure fails the pair.
    async fn income_and_expense(
        pool: &PgPool,
        user_id: Uuid,
        interval: DateInterval,
    ) -> Result<(Decimal, Decimal), AppError> {
        futures::try_join!(
            AggregationService::sum_by_period_and_type(
                pool,
                user_id,
                interval,
                TransactionType::Income
            ),
            AggregationService::sum_by_period_and_type(
                pool,
                user_id,
                interval,
                TransactionType::Expense
            ),
        )
    }
}

/// Parse the `type` parameter of the category breakdown
pub fn breakdown_type(raw: Option<&str>) -> Result<TransactionType, AppError> {
    let raw = raw.map(str::trim).filter(|t| !t.is_empty()).ok_or_else(|| {
        AppError::ValidationError("type is required (Pemasukan or Pengeluaran)".to_string())
    })?;

    TransactionType::parse(raw).ok_or_else(|| {
        AppError::ValidationError(format!(
            "Invalid type: {raw} (expected Pemasukan or Pengeluaran)"
        ))
    })
}
