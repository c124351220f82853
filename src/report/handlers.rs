use actix_web::{get, web, HttpResponse};
use sqlx::PgPool;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;
use crate::period::{PeriodError, PeriodQuery, PeriodSelector};
use crate::transaction::models::TransactionType;

use super::models::{
    BalanceResponse, CategoryBreakdownQuery, CategoryBreakdownResponse, ExpenseResponse,
    IncomeResponse, MonthlySummary, MonthlySummaryQuery,
};
use super::service::{breakdown_type, ReportService};

/// GET /api/transaction/income - Total income for a day, month or year
#[utoipa::path(
    get,
    path = "/api/transaction/income",
    tag = "Reports",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Total income", body = IncomeResponse),
        (status = 400, description = "Invalid period", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/api/transaction/income")]
pub async fn get_income(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let selector = PeriodSelector::from_query(&query)?;

    let total_income =
        ReportService::total(pool.get_ref(), auth.user_id, selector, TransactionType::Income)
            .await?;

    Ok(HttpResponse::Ok().json(IncomeResponse { total_income }))
}

async fn expense_total(
    pool: &PgPool,
    auth: AuthenticatedUser,
    query: &PeriodQuery,
) -> Result<HttpResponse, AppError> {
    let selector = PeriodSelector::from_query(query)?;

    let total_expense =
        ReportService::total(pool, auth.user_id, selector, TransactionType::Expense).await?;

    Ok(HttpResponse::Ok().json(ExpenseResponse { total_expense }))
}

/// GET /api/transaction/outcome - Total expense for a day, month or year
#[utoipa::path(
    get,
    path = "/api/transaction/outcome",
    tag = "Reports",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Total expense", body = ExpenseResponse),
        (status = 400, description = "Invalid period", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/api/transaction/outcome")]
pub async fn get_outcome(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    expense_total(pool.get_ref(), auth, &query).await
}

/// GET /api/transaction/expense - Alias of /outcome
#[utoipa::path(
    get,
    path = "/api/transaction/expense",
    tag = "Reports",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Total expense", body = ExpenseResponse),
        (status = 400, description = "Invalid period", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/api/transaction/expense")]
pub async fn get_expense(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    expense_total(pool.get_ref(), auth, &query).await
}

/// GET /api/transaction/balance - Income minus expense for a day, month or year
#[utoipa::path(
    get,
    path = "/api/transaction/balance",
    tag = "Reports",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Net balance", body = BalanceResponse),
        (status = 400, description = "Invalid period", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/api/transaction/balance")]
pub async fn get_balance(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let selector = PeriodSelector::from_query(&query)?;

    let balance = ReportService::net_balance(pool.get_ref(), auth.user_id, selector).await?;

    Ok(HttpResponse::Ok().json(BalanceResponse { balance }))
}

/// GET /api/transaction/summary - Income, expense and balance of one month
#[utoipa::path(
    get,
    path = "/api/transaction/summary",
    tag = "Reports",
    params(MonthlySummaryQuery),
    responses(
        (status = 200, description = "Monthly summary", body = MonthlySummary),
        (status = 400, description = "Missing or invalid year/month", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/api/transaction/summary")]
pub async fn get_monthly_summary(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<MonthlySummaryQuery>,
) -> Result<HttpResponse, AppError> {
    let (Some(year), Some(month)) = (query.year, query.month) else {
        return Err(PeriodError::MonthRequired.into());
    };

    let summary = ReportService::monthly_summary(pool.get_ref(), auth.user_id, year, month).await?;

    Ok(HttpResponse::Ok().json(summary))
}

/// GET /api/transaction/chart - Per-category totals of one type
#[utoipa::path(
    get,
    path = "/api/transaction/chart",
    tag = "Reports",
    params(CategoryBreakdownQuery),
    responses(
        (status = 200, description = "Category breakdown sorted by category name", body = CategoryBreakdownResponse),
        (status = 400, description = "Missing type or invalid period", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/api/transaction/chart")]
pub async fn get_category_breakdown(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<CategoryBreakdownQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let transaction_type = breakdown_type(query.transaction_type.as_deref())?;
    let selector = PeriodSelector::month_or_year_from_query(&PeriodQuery {
        date: None,
        year: query.year,
        month: query.month,
    })?;

    let breakdown =
        ReportService::category_breakdown(pool.get_ref(), auth.user_id, selector, transaction_type)
            .await?;

    Ok(HttpResponse::Ok().json(breakdown))
}
