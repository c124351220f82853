use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Category joined with the name of its transaction type
#[derive(Debug, Clone, FromRow)]
pub struct CategoryWithType {
    pub id: Uuid,
    pub name: String,
    pub type_name: String,
}

/// Minimal projection used when labelling aggregated rows
#[derive(Debug, Clone, FromRow)]
pub struct CategoryName {
    pub id: Uuid,
    pub name: String,
}

/// Category information returned in responses
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    /// Unique category identifier
    pub id: Uuid,
    /// Category name, used as the `category` field when writing transactions
    #[schema(example = "Groceries")]
    pub name: String,
    /// Transaction type of the category (Pemasukan or Pengeluaran)
    #[serde(rename = "type")]
    #[schema(example = "Pengeluaran")]
    pub type_name: String,
}

impl From<CategoryWithType> for CategoryResponse {
    fn from(c: CategoryWithType) -> Self {
        Self {
            id: c.id,
            name: c.name,
            type_name: c.type_name,
        }
    }
}
