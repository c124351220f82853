use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::PgPool;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;

use super::models::{
    ApiResponse, CreateTransactionDto, MessageResponse, TransactionDetailResponse,
    TransactionIdPath, TransactionResponse, UpdateTransactionDto,
};
use super::service::TransactionService;

/// GET /api/transaction - List the caller's transactions
#[utoipa::path(
    get,
    path = "/api/transaction",
    tag = "Transactions",
    responses(
        (status = 200, description = "Transactions wrapped in {message, data}", body = Vec<TransactionDetailResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/api/transaction")]
pub async fn list_transactions(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let transactions = TransactionService::list_transactions(pool.get_ref(), auth.user_id).await?;

    let data: Vec<TransactionDetailResponse> = transactions.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(ApiResponse {
        message: "successfully get data",
        data,
    }))
}

/// GET /api/transaction/{id} - Get one of the caller's transactions
#[utoipa::path(
    get,
    path = "/api/transaction/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    responses(
        (status = 200, description = "Transaction wrapped in {message, data}", body = TransactionDetailResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/api/transaction/{id}")]
pub async fn get_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<TransactionIdPath>,
) -> Result<HttpResponse, AppError> {
    let transaction =
        TransactionService::get_transaction(pool.get_ref(), auth.user_id, path.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse {
        message: "successfully get data",
        data: TransactionDetailResponse::from(transaction),
    }))
}

/// POST /api/transaction - Record a new transaction
#[utoipa::path(
    post,
    path = "/api/transaction",
    tag = "Transactions",
    request_body = CreateTransactionDto,
    responses(
        (status = 201, description = "Transaction created, wrapped in {message, data}", body = TransactionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/api/transaction")]
pub async fn create_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    body: web::Json<CreateTransactionDto>,
) -> Result<HttpResponse, AppError> {
    let new = body.into_inner().validate_into()?;

    let transaction =
        TransactionService::create_transaction(pool.get_ref(), auth.user_id, new).await?;

    Ok(HttpResponse::Created().json(ApiResponse {
        message: "successfully added data",
        data: TransactionResponse::from(transaction),
    }))
}

/// PUT /api/transaction/{id} - Update the supplied fields of a transaction
#[utoipa::path(
    put,
    path = "/api/transaction/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    request_body = UpdateTransactionDto,
    responses(
        (status = 200, description = "Transaction updated, wrapped in {message, data}", body = TransactionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Transaction or category not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[put("/api/transaction/{id}")]
pub async fn update_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<TransactionIdPath>,
    body: web::Json<UpdateTransactionDto>,
) -> Result<HttpResponse, AppError> {
    let changes = body.into_inner().validate_into()?;

    let transaction =
        TransactionService::update_transaction(pool.get_ref(), auth.user_id, path.id, changes)
            .await?;

    Ok(HttpResponse::Ok().json(ApiResponse {
        message: "Transaction updated successfully",
        data: TransactionResponse::from(transaction),
    }))
}

/// DELETE /api/transaction/{id} - Permanently delete a transaction
#[utoipa::path(
    delete,
    path = "/api/transaction/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    responses(
        (status = 200, description = "Transaction deleted", body = MessageResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/api/transaction/{id}")]
pub async fn delete_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<TransactionIdPath>,
) -> Result<HttpResponse, AppError> {
    TransactionService::delete_transaction(pool.get_ref(), auth.user_id, path.id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Transaction deleted successfully".to_string(),
    }))
}
