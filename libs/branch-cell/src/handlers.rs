use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CreateBranchRequest, UpdateBranchRequest};
use crate::services::BranchService;

#[axum::debug_handler]
pub async fn create_branch(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateBranchRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    user.require_admin()?;

    if request.name.trim().is_empty() {
        return Err(AppError::ValidationError("Branch name is required".to_string()));
    }

    let service = BranchService::new(&config);
    let branch = service
        .create_branch(&user.owner_id, request, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(json!(branch))))
}

#[axum::debug_handler]
pub async fn get_branch(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(branch_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    user.resolve_branch_scope(Some(&branch_id))?;

    let service = BranchService::new(&config);
    let branch = service
        .get_branch(&user.owner_id, &branch_id, auth.token())
        .await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    Ok(Json(json!(branch)))
}

#[axum::debug_handler]
pub async fn list_branches(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    user.require_admin()?;

    let service = BranchService::new(&config);
    let branches = service
        .list_branches(&user.owner_id, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "branches": branches,
        "total": branches.len()
    })))
}

#[axum::debug_handler]
pub async fn update_branch(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(branch_id): Path<String>,
    Json(request): Json<UpdateBranchRequest>,
) -> Result<Json<Value>, AppError> {
    user.require_admin()?;

    let service = BranchService::new(&config);
    let branch = service
        .update_branch(&user.owner_id, &branch_id, request, auth.token())
        .await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    Ok(Json(json!(branch)))
}

#[axum::debug_handler]
pub async fn delete_branch(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(branch_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    user.require_admin()?;

    let service = BranchService::new(&config);
    service
        .delete_branch(&user.owner_id, &branch_id, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({ "success": true })))
}
