use actix_web::{get, web, HttpResponse, Responder};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::{category, report, transaction};

/// Health check endpoint that verifies database connectivity
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and database are reachable"),
        (status = 503, description = "Database is unreachable")
    )
)]
#[get("/health")]
pub async fn health_check(pool: web::Data<PgPool>) -> impl Responder {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(_) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected"
        })),
    }
}

/// Register extractor settings and every API route.
/// Shared state (pool, JWT secret) is supplied by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::InvalidPeriod(err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    }))
    .service(health_check)
    .service(category::list_categories)
    // Transaction endpoints (order matters: specific routes before generic {id} routes)
    .service(transaction::list_transactions)
    .service(transaction::create_transaction)
    .service(report::get_income)
    .service(report::get_outcome)
    .service(report::get_expense)
    .service(report::get_balance)
    .service(report::get_monthly_summary)
    .service(report::get_category_breakdown)
    .service(transaction::get_transaction)
    .service(transaction::update_transaction)
    .service(transaction::delete_transaction);
}
