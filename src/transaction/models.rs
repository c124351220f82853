use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{field_errors, AppError, FieldError};
use crate::period::parse_wall_clock;

// NUMERIC(15, 2)
const AMOUNT_LIMIT: i64 = 10_000_000_000_000;
const AMOUNT_MAX_SCALE: u32 = 2;

const AMOUNT_NOT_A_NUMBER: &str = "amount must be a number";
const AMOUNT_TOO_PRECISE: &str = "amount cannot have more than 2 decimal places";
const AMOUNT_TOO_LARGE: &str = "amount must be less than 10000000000000";

/// Transaction type, derived from the category a transaction is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum TransactionType {
    /// Money received
    #[serde(rename = "Pemasukan")]
    Income,
    /// Money spent
    #[serde(rename = "Pengeluaran")]
    Expense,
}

impl TransactionType {
    /// Name stored in the `transaction_types` table
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Pemasukan",
            TransactionType::Expense => "Pengeluaran",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pemasukan" => Some(TransactionType::Income),
            "Pengeluaran" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

/// How a transaction was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Cash,
    Qris,
    Debit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Qris => "QRIS",
            PaymentMethod::Debit => "DEBIT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CASH" => Some(PaymentMethod::Cash),
            "QRIS" => Some(PaymentMethod::Qris),
            "DEBIT" => Some(PaymentMethod::Debit),
            _ => None,
        }
    }
}

/// Database model for transactions
#[derive(Debug, Clone, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_date: NaiveDateTime,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Transaction joined with its category and transaction type names
#[derive(Debug, Clone, FromRow)]
pub struct TransactionDetail {
    pub id: Uuid,
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_date: NaiveDateTime,
    pub payment_method: String,
    pub category_name: String,
    pub type_name: String,
}

/// Stored transaction returned after create and update
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 50000)]
    pub amount: Decimal,
    #[schema(example = "Weekly groceries")]
    pub description: Option<String>,
    #[schema(value_type = String, example = "2025-03-15T00:00:00")]
    pub transaction_date: NaiveDateTime,
    #[schema(example = "CASH")]
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            category_id: t.category_id,
            amount: t.amount,
            description: t.description,
            transaction_date: t.transaction_date,
            payment_method: t.payment_method,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Denormalized transaction for display, with category and type names
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetailResponse {
    pub id: Uuid,
    /// Transaction type name (Pemasukan or Pengeluaran)
    #[schema(example = "Pengeluaran")]
    pub jenis: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 50000)]
    pub amount: Decimal,
    #[schema(example = "CASH")]
    pub payment_method: String,
    #[schema(example = "Groceries")]
    pub category: String,
    #[schema(value_type = String, example = "2025-03-15T00:00:00")]
    pub transaction_date: NaiveDateTime,
    pub description: Option<String>,
}

impl From<TransactionDetail> for TransactionDetailResponse {
    fn from(t: TransactionDetail) -> Self {
        Self {
            id: t.id,
            jenis: t.type_name,
            amount: t.amount,
            payment_method: t.payment_method,
            category: t.category_name,
            transaction_date: t.transaction_date,
            description: t.description,
        }
    }
}

/// `{message, data}` envelope used by the CRUD endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: &'static str,
    pub data: T,
}

/// Acknowledgement without a payload
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Transaction deleted successfully")]
    pub message: String,
}

/// Request body for creating a transaction.
/// Typed fields are read as raw JSON so a wrong type is reported next to every
/// other field error instead of aborting deserialization.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTransactionDto {
    /// Transaction amount (greater than 0, at most 2 decimal places)
    #[validate(required(message = "amount is required"))]
    #[schema(value_type = f64, example = 50000)]
    pub amount: Option<Value>,

    /// Optional description
    #[validate(length(max = 255, message = "description cannot exceed 255 characters"))]
    #[schema(example = "Weekly groceries")]
    pub description: Option<String>,

    /// Date (YYYY-MM-DD) or timestamp of the transaction
    #[validate(required(message = "transactionDate is required"))]
    #[schema(value_type = String, example = "2025-03-15")]
    pub transaction_date: Option<Value>,

    /// CASH, QRIS or DEBIT
    #[validate(required(message = "paymentMethod is required"))]
    #[schema(value_type = String, example = "CASH")]
    pub payment_method: Option<Value>,

    /// Category name
    #[validate(required(message = "category is required"))]
    #[schema(value_type = String, example = "Groceries")]
    pub category: Option<Value>,
}

/// Validated input for a new transaction
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_date: NaiveDateTime,
    pub payment_method: PaymentMethod,
    pub category: String,
}

impl CreateTransactionDto {
    /// Check every field and collect all failures before converting.
    pub fn validate_into(self) -> Result<NewTransaction, AppError> {
        let mut errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e),
        };

        let amount = valid_amount(self.amount.as_ref(), &mut errors);
        let transaction_date = coerce_date(self.transaction_date.as_ref(), &mut errors);
        let payment_method = known_payment_method(self.payment_method.as_ref(), &mut errors);
        let category = category_name(self.category.as_ref(), &mut errors);

        if !errors.is_empty() {
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            return Err(AppError::InvalidFields(errors));
        }

        match (amount, transaction_date, payment_method, category) {
            (Some(amount), Some(transaction_date), Some(payment_method), Some(category)) => {
                Ok(NewTransaction {
                    amount,
                    description: self.description,
                    transaction_date,
                    payment_method,
                    category,
                })
            }
            _ => Err(AppError::ValidationError(
                "Missing required fields".to_string(),
            )),
        }
    }
}

/// Request body for updating a transaction (all fields optional).
/// Omitted fields keep their stored value; `"description": null` clears it.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTransactionDto {
    #[schema(value_type = Option<f64>, example = 75000)]
    pub amount: Option<Value>,

    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 255, message = "description cannot exceed 255 characters"))]
    #[schema(value_type = Option<String>, example = "Updated description")]
    pub description: Option<Option<String>>,

    #[schema(value_type = Option<String>, example = "2025-03-16")]
    pub transaction_date: Option<Value>,

    #[schema(value_type = Option<String>, example = "QRIS")]
    pub payment_method: Option<Value>,

    #[schema(value_type = Option<String>, example = "Transport")]
    pub category: Option<Value>,
}

/// Validated partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    pub amount: Option<Decimal>,
    pub description: Option<Option<String>>,
    pub transaction_date: Option<NaiveDateTime>,
    pub payment_method: Option<PaymentMethod>,
    pub category: Option<String>,
}

impl UpdateTransactionDto {
    pub fn validate_into(self) -> Result<TransactionChanges, AppError> {
        let mut errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e),
        };

        let amount = valid_amount(self.amount.as_ref(), &mut errors);
        let transaction_date = coerce_date(self.transaction_date.as_ref(), &mut errors);
        let payment_method = known_payment_method(self.payment_method.as_ref(), &mut errors);
        let category = category_name(self.category.as_ref(), &mut errors);

        if !errors.is_empty() {
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            return Err(AppError::InvalidFields(errors));
        }

        Ok(TransactionChanges {
            amount,
            description: self.description,
            transaction_date,
            payment_method,
            category,
        })
    }
}

/// Distinguishes an explicit `null` from an absent field
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Amount must fit `NUMERIC(15, 2)` exactly: positive, at most 2 decimal places,
/// below 10^13. Numeric strings are accepted.
fn valid_amount(raw: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<Decimal> {
    let raw = raw?;
    let parsed = match raw {
        Value::Number(n) => parse_decimal(&n.to_string()).ok_or_else(|| {
            // Only extreme exponents fail to parse
            if n.as_f64().is_some_and(|f| f.abs() >= 1.0) {
                AMOUNT_TOO_LARGE
            } else {
                AMOUNT_TOO_PRECISE
            }
        }),
        Value::String(s) => parse_decimal(s.trim()).ok_or(AMOUNT_NOT_A_NUMBER),
        _ => Err(AMOUNT_NOT_A_NUMBER),
    };

    let checked = parsed.and_then(|amount| {
        if amount <= Decimal::ZERO {
            Err("amount must be greater than 0")
        } else if amount.normalize().scale() > AMOUNT_MAX_SCALE {
            Err(AMOUNT_TOO_PRECISE)
        } else if amount >= Decimal::from(AMOUNT_LIMIT) {
            Err(AMOUNT_TOO_LARGE)
        } else {
            Ok(amount)
        }
    });

    match checked {
        Ok(amount) => Some(amount),
        Err(message) => {
            errors.push(FieldError::new("amount", message));
            None
        }
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn coerce_date(raw: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<NaiveDateTime> {
    let raw = raw?;
    let parsed = raw.as_str().and_then(parse_wall_clock);
    if parsed.is_none() {
        errors.push(FieldError::new("transactionDate", "invalid transactionDate"));
    }
    parsed
}

fn known_payment_method(raw: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<PaymentMethod> {
    let raw = raw?;
    let parsed = raw.as_str().and_then(PaymentMethod::parse);
    if parsed.is_none() {
        errors.push(FieldError::new(
            "paymentMethod",
            "paymentMethod must be one of CASH, QRIS, DEBIT",
        ));
    }
    parsed
}

fn category_name(raw: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<String> {
    let Some(name) = raw?.as_str() else {
        errors.push(FieldError::new("category", "category must be a string"));
        return None;
    };
    let trimmed = name.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new("category", "category is required"));
        return None;
    }
    Some(trimmed.to_string())
}

/// Path parameters for transaction ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct TransactionIdPath {
    /// Transaction UUID
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn create_dto(value: serde_json::Value) -> CreateTransactionDto {
        serde_json::from_value(value).expect("Should deserialize")
    }

    fn fields(err: AppError) -> Vec<String> {
        match err {
            AppError::InvalidFields(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected InvalidFields, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_create_converts() {
        let dto = create_dto(json!({
            "amount": 50000,
            "transactionDate": "2025-03-15",
            "paymentMethod": "CASH",
            "category": " Groceries "
        }));

        let new = dto.validate_into().expect("Should be valid");
        assert_eq!(new.amount, Decimal::from(50000));
        assert_eq!(new.payment_method, PaymentMethod::Cash);
        assert_eq!(new.category, "Groceries");
        assert_eq!(new.description, None);
        assert_eq!(
            new.transaction_date,
            NaiveDate::from_ymd_opt(2025, 3, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let dto = create_dto(json!({
            "amount": -5,
            "transactionDate": "2025-03-15",
            "paymentMethod": "CASH",
            "category": "Groceries"
        }));

        let err = dto.validate_into().unwrap_err();
        match err {
            AppError::InvalidFields(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "amount");
                assert_eq!(errors[0].message, "amount must be greater than 0");
            }
            other => panic!("expected InvalidFields, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_amount_is_rejected() {
        let dto = create_dto(json!({
            "amount": 0,
            "transactionDate": "2025-03-15",
            "paymentMethod": "DEBIT",
            "category": "Groceries"
        }));
        assert_eq!(fields(dto.validate_into().unwrap_err()), vec!["amount"]);
    }

    #[test]
    fn test_all_missing_fields_are_reported_together() {
        let dto = create_dto(json!({}));
        let mut reported = fields(dto.validate_into().unwrap_err());
        reported.sort();
        reported.dedup();
        assert_eq!(
            reported,
            vec!["amount", "category", "paymentMethod", "transactionDate"]
        );
    }

    #[test]
    fn test_every_invalid_value_is_reported() {
        let dto = create_dto(json!({
            "amount": -1,
            "transactionDate": "yesterday",
            "paymentMethod": "CREDIT",
            "category": "   "
        }));
        assert_eq!(
            fields(dto.validate_into().unwrap_err()),
            vec!["amount", "category", "paymentMethod", "transactionDate"]
        );
    }

    #[test]
    fn test_long_description_is_rejected() {
        let dto = create_dto(json!({
            "amount": 10,
            "description": "x".repeat(256),
            "transactionDate": "2025-03-15",
            "paymentMethod": "QRIS",
            "category": "Transport"
        }));
        assert_eq!(fields(dto.validate_into().unwrap_err()), vec!["description"]);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: Result<CreateTransactionDto, _> = serde_json::from_value(json!({
            "amount": 10,
            "transactionDate": "2025-03-15",
            "paymentMethod": "CASH",
            "category": "Groceries",
            "userId": "someone-else"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let absent: UpdateTransactionDto = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.description, None);

        let cleared: UpdateTransactionDto =
            serde_json::from_value(json!({ "description": null })).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: UpdateTransactionDto =
            serde_json::from_value(json!({ "description": "lunch" })).unwrap();
        assert_eq!(set.description, Some(Some("lunch".to_string())));
    }

    #[test]
    fn test_update_with_no_fields_changes_nothing() {
        let changes = UpdateTransactionDto::default().validate_into().unwrap();
        assert_eq!(changes, TransactionChanges::default());
    }

    #[test]
    fn test_update_validates_supplied_fields() {
        let dto: UpdateTransactionDto = serde_json::from_value(json!({
            "amount": -3,
            "paymentMethod": "cash"
        }))
        .unwrap();
        assert_eq!(
            fields(dto.validate_into().unwrap_err()),
            vec!["amount", "paymentMethod"]
        );
    }

    #[test]
    fn test_update_converts_supplied_fields() {
        let dto: UpdateTransactionDto = serde_json::from_value(json!({
            "amount": "12.50",
            "paymentMethod": "QRIS",
            "category": "Transport"
        }))
        .unwrap();
        let changes = dto.validate_into().unwrap();
        assert_eq!(changes.amount, Some(Decimal::new(1250, 2)));
        assert_eq!(changes.payment_method, Some(PaymentMethod::Qris));
        assert_eq!(changes.category.as_deref(), Some("Transport"));
        assert_eq!(changes.transaction_date, None);
    }

    fn amount_message(amount: serde_json::Value) -> String {
        let dto = create_dto(json!({
            "amount": amount,
            "transactionDate": "2025-03-15",
            "paymentMethod": "CASH",
            "category": "Groceries"
        }));
        match dto.validate_into().unwrap_err() {
            AppError::InvalidFields(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "amount");
                errors[0].message.clone()
            }
            other => panic!("expected InvalidFields, got {other:?}"),
        }
    }

    #[test]
    fn test_amount_with_more_than_two_decimals_is_rejected() {
        assert_eq!(
            amount_message(json!(0.001)),
            "amount cannot have more than 2 decimal places"
        );
        assert_eq!(
            amount_message(json!(1.005)),
            "amount cannot have more than 2 decimal places"
        );
        assert_eq!(
            amount_message(json!("1.005")),
            "amount cannot have more than 2 decimal places"
        );
    }

    #[test]
    fn test_amount_at_column_limit_is_rejected() {
        assert_eq!(
            amount_message(json!(1e14)),
            "amount must be less than 10000000000000"
        );
        assert_eq!(
            amount_message(json!(10_000_000_000_000i64)),
            "amount must be less than 10000000000000"
        );
        assert_eq!(
            amount_message(json!(1e300)),
            "amount must be less than 10000000000000"
        );
    }

    #[test]
    fn test_amount_inside_limits_is_kept_exactly() {
        let dto = create_dto(json!({
            "amount": "9999999999999.99",
            "transactionDate": "2025-03-15",
            "paymentMethod": "CASH",
            "category": "Groceries"
        }));
        let new = dto.validate_into().unwrap();
        assert_eq!(new.amount, Decimal::new(999_999_999_999_999, 2));

        let dto = create_dto(json!({
            "amount": 1.10,
            "transactionDate": "2025-03-15",
            "paymentMethod": "CASH",
            "category": "Groceries"
        }));
        assert_eq!(dto.validate_into().unwrap().amount, Decimal::new(11, 1));
    }

    #[test]
    fn test_wrong_types_are_reported_with_other_fields() {
        let dto = create_dto(json!({
            "amount": "abc",
            "transactionDate": "yesterday",
            "paymentMethod": "CREDIT"
        }));
        assert_eq!(
            fields(dto.validate_into().unwrap_err()),
            vec!["amount", "category", "paymentMethod", "transactionDate"]
        );

        let dto = create_dto(json!({
            "amount": true,
            "transactionDate": 20250315,
            "paymentMethod": 1,
            "category": ["Groceries"]
        }));
        match dto.validate_into().unwrap_err() {
            AppError::InvalidFields(errors) => {
                let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
                assert_eq!(
                    messages,
                    vec![
                        "amount must be a number",
                        "category must be a string",
                        "paymentMethod must be one of CASH, QRIS, DEBIT",
                        "invalid transactionDate",
                    ]
                );
            }
            other => panic!("expected InvalidFields, got {other:?}"),
        }
    }

    #[test]
    fn test_update_amount_limits_apply() {
        for amount in [json!(0.001), json!(1e14), json!("abc")] {
            let dto: UpdateTransactionDto =
                serde_json::from_value(json!({ "amount": amount })).unwrap();
            assert_eq!(fields(dto.validate_into().unwrap_err()), vec!["amount"]);
        }
    }

    #[test]
    fn test_update_long_description_is_rejected() {
        let dto: UpdateTransactionDto =
            serde_json::from_value(json!({ "description": "x".repeat(256) })).unwrap();
        match dto.validate_into().unwrap_err() {
            AppError::InvalidFields(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "description");
                assert_eq!(
                    errors[0].message,
                    "description cannot exceed 255 characters"
                );
            }
            other => panic!("expected InvalidFields, got {other:?}"),
        }

        let cleared: UpdateTransactionDto =
            serde_json::from_value(json!({ "description": null })).unwrap();
        assert!(cleared.validate_into().is_ok());
    }

    #[test]
    fn test_type_names_round_trip() {
        for ty in [TransactionType::Income, TransactionType::Expense] {
            assert_eq!(TransactionType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(TransactionType::parse("pengeluaran"), None);
    }

    #[test]
    fn test_payment_methods() {
        assert_eq!(PaymentMethod::parse("QRIS"), Some(PaymentMethod::Qris));
        assert_eq!(PaymentMethod::Debit.as_str(), "DEBIT");
        assert_eq!(PaymentMethod::parse("TRANSFER"), None);
    }

    #[test]
    fn test_detail_response_serializes_amount_as_number() {
        let detail = TransactionDetail {
            id: Uuid::new_v4(),
            amount: Decimal::from(50000),
            description: None,
            transaction_date: NaiveDate::from_ymd_opt(2025, 3, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            payment_method: "CASH".to_string(),
            category_name: "Groceries".to_string(),
            type_name: "Pengeluaran".to_string(),
        };

        let value = serde_json::to_value(TransactionDetailResponse::from(detail)).unwrap();
        assert_eq!(value["amount"].as_f64(), Some(50000.0));
        assert_eq!(value["jenis"], "Pengeluaran");
        assert_eq!(value["category"], "Groceries");
        assert_eq!(value["paymentMethod"], "CASH");
        assert_eq!(value["transactionDate"], "2025-03-15T00:00:00");
    }
}
