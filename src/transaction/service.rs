use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::models::{NewTransaction, Transaction, TransactionChanges, TransactionDetail};
use crate::category::CategoryService;
use crate::errors::AppError;

/// Persistence for transaction rows.
/// Every read and mutation is scoped to the owning user; a transaction owned by
/// someone else is indistinguishable from one that does not exist.
pub struct TransactionService;

impl TransactionService {
    /// Resolve the category and insert a new transaction in one database transaction.
    pub async fn create_transaction(
        pool: &PgPool,
        user_id: Uuid,
        new: NewTransaction,
    ) -> Result<Transaction, AppError> {
        let mut tx = pool.begin().await?;

        // 1. Category name -> id; an unknown name aborts before anything is written
        let category_id = CategoryService::resolve_id_by_name(&mut *tx, &new.category).await?;

        // 2. Insert the row
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions
                (user_id, category_id, amount, description, transaction_date, payment_method)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, category_id, amount, description, transaction_date,
                      payment_method, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .bind(new.amount)
        .bind(&new.description)
        .bind(new.transaction_date)
        .bind(new.payment_method.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(transaction_id = %transaction.id, %user_id, "Transaction created");
        Ok(transaction)
    }

    /// All transactions of a user with category and type names, newest first
    pub async fn list_transactions(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<TransactionDetail>, AppError> {
        sqlx::query_as::<_, TransactionDetail>(
            r#"
            SELECT t.id, t.amount, t.description, t.transaction_date, t.payment_method,
                   c.name AS category_name, tt.name AS type_name
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            JOIN transaction_types tt ON tt.id = c.type_id
            WHERE t.user_id = $1
            ORDER BY t.transaction_date DESC, t.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::from)
    }

    /// Get a single owned transaction by ID
    pub async fn get_transaction(
        pool: &PgPool,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<TransactionDetail, AppError> {
        sqlx::query_as::<_, TransactionDetail>(
            r#"
            SELECT t.id, t.amount, t.description, t.transaction_date, t.payment_method,
                   c.name AS category_name, tt.name AS type_name
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            JOIN transaction_types tt ON tt.id = c.type_id
            WHERE t.id = $1 AND t.user_id = $2
            "#,
        )
        .bind(transaction_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))
    }

    /// Replace the supplied fields of an owned transaction.
    /// Ownership check, category resolution and the write share one locked transaction.
    pub async fn update_transaction(
        pool: &PgPool,
        user_id: Uuid,
        transaction_id: Uuid,
        changes: TransactionChanges,
    ) -> Result<Transaction, AppError> {
        let mut tx = pool.begin().await?;

        // 1. Fetch and lock the existing row, scoped to the caller
        let existing = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, category_id, amount, description, transaction_date,
                   payment_method, created_at, updated_at
            FROM transactions
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(transaction_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

        // 2. Resolve the new category if one was supplied
        let category_id = match &changes.category {
            Some(name) => CategoryService::resolve_id_by_name(&mut *tx, name).await?,
            None => existing.category_id,
        };

        // 3. Merge: omitted fields keep the stored value
        let amount = changes.amount.unwrap_or(existing.amount);
        let description = match changes.description {
            Some(description) => description,
            None => existing.description,
        };
        let transaction_date = changes
            .transaction_date
            .unwrap_or(existing.transaction_date);
        let payment_method = changes
            .payment_method
            .map(|m| m.as_str().to_string())
            .unwrap_or(existing.payment_method);

        let updated = sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions SET
                category_id = $3,
                amount = $4,
                description = $5,
                transaction_date = $6,
                payment_method = $7,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, category_id, amount, description, transaction_date,
                      payment_method, created_at, updated_at
            "#,
        )
        .bind(transaction_id)
        .bind(user_id)
        .bind(category_id)
        .bind(amount)
        .bind(&description)
        .bind(transaction_date)
        .bind(&payment_method)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(%transaction_id, %user_id, "Transaction updated");
        Ok(updated)
    }

    /// Permanently delete an owned transaction.
    /// Ownership is part of the DELETE predicate.
    pub async fn delete_transaction(
        pool: &PgPool,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
            .bind(transaction_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Transaction not found".to_string()));
        }

        info!(%transaction_id, %user_id, "Transaction deleted");
        Ok(())
    }
}
