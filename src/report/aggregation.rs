use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::models::{label_groups, CategorySumRow, CategoryTotal};
use crate::category::CategoryService;
use crate::errors::AppError;
use crate::period::DateInterval;
use crate::transaction::models::TransactionType;

/// Read-only sums over a user's transactions inside a `[start, end)` window.
/// The transaction type is taken from the category, never from the row itself.
pub struct AggregationService;

impl AggregationService {
    /// Sum of amounts of one type; zero when nothing matches
    pub async fn sum_by_period_and_type(
        pool: &PgPool,
        user_id: Uuid,
        interval: DateInterval,
        transaction_type: TransactionType,
    ) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(t.amount), 0)
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            JOIN transaction_types tt ON tt.id = c.type_id
            WHERE t.user_id = $1
              AND t.transaction_date >= $2
              AND t.transaction_date < $3
              AND tt.name = $4
            "#,
        )
        .bind(user_id)
        .bind(interval.start)
        .bind(interval.end)
        .bind(transaction_type.as_str())
        .fetch_one(pool)
        .await?;

        debug!(
            %user_id,
            start = %interval.start,
            end = %interval.end,
            transaction_type = transaction_type.as_str(),
            %total,
            "Summed transactions"
        );
        Ok(total)
    }

    /// Per-category sums of one type. Categories without matching rows are absent.
    pub async fn grouped_by_category(
        pool: &PgPool,
        user_id: Uuid,
        interval: DateInterval,
        transaction_type: TransactionType,
    ) -> Result<Vec<CategoryTotal>, AppError> {
        let rows = sqlx::query_as::<_, CategorySumRow>(
            r#"
            SELECT t.category_id, SUM(t.amount) AS total_amount
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            JOIN transaction_types tt ON tt.id = c.type_id
            WHERE t.user_id = $1
              AND t.transaction_date >= $2
              AND t.transaction_date < $3
              AND tt.name = $4
            GROUP BY t.category_id
            "#,
        )
        .bind(user_id)
        .bind(interval.start)
        .bind(interval.end)
        .bind(transaction_type.as_str())
        .fetch_all(pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.category_id).collect();
        let names = CategoryService::names_by_ids(pool, &ids).await?;

        Ok(label_groups(rows, &names))
    }
}
