use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::category::models::CategoryResponse;
use crate::errors::{ErrorResponse, FieldError};
use crate::report::models::{
    BalanceResponse, CategoryBreakdownResponse, CategoryTotal, ExpenseResponse, IncomeResponse,
    MonthlySummary,
};
use crate::transaction::models::{
    CreateTransactionDto, MessageResponse, PaymentMethod, TransactionDetailResponse,
    TransactionResponse, TransactionType, UpdateTransactionDto,
};

/// Security scheme modifier for Bearer token authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT access token; `sub` is the user id"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Money Tracker API",
        version = "1.0.0",
        description = "Personal income and expense tracking with period reports"
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Transactions", description = "Income and expense records of the caller"),
        (name = "Reports", description = "Totals, balance, monthly summary and category breakdown"),
        (name = "Categories", description = "Global category reference data")
    ),
    paths(
        crate::routes::health_check,
        // Transaction endpoints
        crate::transaction::handlers::list_transactions,
        crate::transaction::handlers::get_transaction,
        crate::transaction::handlers::create_transaction,
        crate::transaction::handlers::update_transaction,
        crate::transaction::handlers::delete_transaction,
        // Report endpoints
        crate::report::handlers::get_income,
        crate::report::handlers::get_outcome,
        crate::report::handlers::get_expense,
        crate::report::handlers::get_balance,
        crate::report::handlers::get_monthly_summary,
        crate::report::handlers::get_category_breakdown,
        // Category endpoints
        crate::category::handlers::list_categories,
    ),
    components(
        schemas(
            ErrorResponse,
            FieldError,
            // Transaction schemas
            TransactionType,
            PaymentMethod,
            TransactionResponse,
            TransactionDetailResponse,
            CreateTransactionDto,
            UpdateTransactionDto,
            MessageResponse,
            // Report schemas
            IncomeResponse,
            ExpenseResponse,
            BalanceResponse,
            MonthlySummary,
            CategoryTotal,
            CategoryBreakdownResponse,
            // Category schemas
            CategoryResponse,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;
