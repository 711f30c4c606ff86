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

use crate::models::{AdjustStockRequest, CreateItemRequest, InventoryListQuery, UpdateItemRequest};
use crate::services::InventoryService;

#[axum::debug_handler]
pub async fn create_item(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::ValidationError("Item name is required".to_string()));
    }
    if let Some(quantity) = request.quantity {
        if quantity < 0 {
            return Err(AppError::ValidationError("Quantity cannot be negative".to_string()));
        }
    }

    let service = InventoryService::new(&config);
    let item = service
        .create_item(&user.owner_id, request, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(json!(item))))
}

#[axum::debug_handler]
pub async fn get_item(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(item_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = InventoryService::new(&config);
    let item = service
        .get_item(&user.owner_id, &item_id, auth.token())
        .await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    Ok(Json(json!(item)))
}

#[axum::debug_handler]
pub async fn list_items(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(query): Query<InventoryListQuery>,
) -> Result<Json<Value>, AppError> {
    let branch_scope = user.resolve_branch_scope(query.branch_id.as_deref())?;

    let service = InventoryService::new(&config);
    let items = service
        .list_items(&user.owner_id, branch_scope.as_deref(), auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "items": items,
        "total": items.len()
    })))
}

#[axum::debug_handler]
pub async fn list_low_stock(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(query): Query<InventoryListQuery>,
) -> Result<Json<Value>, AppError> {
    let branch_scope = user.resolve_branch_scope(query.branch_id.as_deref())?;

    let service = InventoryService::new(&config);
    let items = service
        .list_low_stock(&user.owner_id, branch_scope.as_deref(), auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "items": items,
        "total": items.len()
    })))
}

#[axum::debug_handler]
pub async fn update_item(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(item_id): Path<String>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<Value>, AppError> {
    if let Some(quantity) = request.quantity {
        if quantity < 0 {
            return Err(AppError::ValidationError("Quantity cannot be negative".to_string()));
        }
    }

    let service = InventoryService::new(&config);
    let item = service
        .update_item(&user.owner_id, &item_id, request, auth.token())
        .await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    Ok(Json(json!(item)))
}

#[axum::debug_handler]
pub async fn adjust_stock(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(item_id): Path<String>,
    Json(request): Json<AdjustStockRequest>,
) -> Result<Json<Value>, AppError> {
    if request.delta == 0 {
        return Err(AppError::ValidationError("Adjustment cannot be zero".to_string()));
    }

    let service = InventoryService::new(&config);
    let item = service
        .adjust_stock(&user.owner_id, &item_id, request.delta, auth.token())
        .await
        .map_err(|e| {
            let text = e.to_string();
            if text.starts_with("Cannot remove") {
                AppError::BadRequest(text)
            } else if text.contains("not found") {
                AppError::NotFound(text)
            } else {
                AppError::Internal(text)
            }
        })?;

    Ok(Json(json!(item)))
}

#[axum::debug_handler]
pub async fn delete_item(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(item_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    user.require_admin()?;

    let service = InventoryService::new(&config);
    service
        .delete_item(&user.owner_id, &item_id, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({ "success": true })))
}
