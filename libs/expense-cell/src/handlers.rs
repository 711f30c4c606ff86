use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CreateExpenseRequest, ExpenseListQuery, UpdateExpenseRequest};
use crate::services::ExpenseService;

#[axum::debug_handler]
pub async fn create_expense(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::ValidationError("Expense title is required".to_string()));
    }
    if request.amount <= 0.0 {
        return Err(AppError::ValidationError("Amount must be positive".to_string()));
    }
    user.resolve_branch_scope(request.branch_id.as_deref())?;

    let service = ExpenseService::new(&config);
    let expense = service
        .create_expense(&user.owner_id, request, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(json!(expense))))
}

#[axum::debug_handler]
pub async fn get_expense(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(expense_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = ExpenseService::new(&config);
    let expense = service
        .get_expense(&user.owner_id, &expense_id, auth.token())
        .await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    user.resolve_branch_scope(expense.branch_id.as_deref())?;

    Ok(Json(json!(expense)))
}

#[axum::debug_handler]
pub async fn list_expenses(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Json<Value>, AppError> {
    let branch_scope = user.resolve_branch_scope(query.branch_id.as_deref())?;

    let service = ExpenseService::new(&config);
    let expenses = service
        .list_expenses(
            &user.owner_id,
            branch_scope.as_deref(),
            query.from,
            query.to,
            auth.token(),
        )
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "expenses": expenses,
        "total": expenses.len()
    })))
}

#[axum::debug_handler]
pub async fn update_expense(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(expense_id): Path<String>,
    Json(request): Json<UpdateExpenseRequest>,
) -> Result<Json<Value>, AppError> {
    if let Some(amount) = request.amount {
        if amount <= 0.0 {
            return Err(AppError::ValidationError("Amount must be positive".to_string()));
        }
    }

    let service = ExpenseService::new(&config);
    let expense = service
        .update_expense(&user.owner_id, &expense_id, request, auth.token())
        .await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    Ok(Json(json!(expense)))
}

#[axum::debug_handler]
pub async fn delete_expense(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(expense_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    user.require_admin()?;

    let service = ExpenseService::new(&config);
    service
        .delete_expense(&user.owner_id, &expense_id, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({ "success": true })))
}
