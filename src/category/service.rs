use std::collections::HashMap;

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::models::{CategoryName, CategoryWithType};
use crate::errors::AppError;

/// Category lookups. Categories are global reference data shared by all users.
pub struct CategoryService;

impl CategoryService {
    /// Resolve a category name to its ID (case-sensitive exact match).
    /// Accepts any executor so it can run inside a write transaction.
    pub async fn resolve_id_by_name<'e, E>(executor: E, name: &str) -> Result<Uuid, AppError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM categories WHERE name = $1")
            .bind(name)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::CategoryNotFound(format!("Category not found: {name}")))
    }

    /// Map category IDs to display names
    pub async fn names_by_ids(
        pool: &PgPool,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, String>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, CategoryName>(
            "SELECT id, name FROM categories WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|c| (c.id, c.name)).collect())
    }

    /// List every category with its transaction type
    pub async fn list_all(pool: &PgPool) -> Result<Vec<CategoryWithType>, AppError> {
        sqlx::query_as::<_, CategoryWithType>(
            r#"
            SELECT c.id, c.name, tt.name AS type_name
            FROM categories c
            JOIN transaction_types tt ON tt.id = c.type_id
            ORDER BY tt.id ASC, c.name ASC
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(AppError::from)
    }
}
