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

use crate::models::{CreateStaffRequest, StaffListQuery, UpdateStaffRequest};
use crate::services::StaffService;

#[axum::debug_handler]
pub async fn create_staff(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    user.require_admin()?;

    if request.name.trim().is_empty() {
        return Err(AppError::ValidationError("Staff name is required".to_string()));
    }
    if request.branch_id.trim().is_empty() {
        return Err(AppError::ValidationError("Branch is required".to_string()));
    }

    let service = StaffService::new(&config);
    let staff = service
        .create_staff(&user.owner_id, request, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(json!(staff))))
}

#[axum::debug_handler]
pub async fn get_staff(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(staff_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = StaffService::new(&config);
    let staff = service
        .get_staff(&user.owner_id, &staff_id, auth.token())
        .await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    user.resolve_branch_scope(Some(&staff.branch_id))?;

    Ok(Json(json!(staff)))
}

#[axum::debug_handler]
pub async fn list_staff(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(query): Query<StaffListQuery>,
) -> Result<Json<Value>, AppError> {
    let branch_scope = user.resolve_branch_scope(query.branch_id.as_deref())?;

    let service = StaffService::new(&config);
    let staff = service
        .list_staff(&user.owner_id, branch_scope.as_deref(), auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "staff": staff,
        "total": staff.len()
    })))
}

#[axum::debug_handler]
pub async fn update_staff(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(staff_id): Path<String>,
    Json(request): Json<UpdateStaffRequest>,
) -> Result<Json<Value>, AppError> {
    user.require_admin()?;

    let service = StaffService::new(&config);
    let staff = service
        .update_staff(&user.owner_id, &staff_id, request, auth.token())
        .await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    Ok(Json(json!(staff)))
}

#[axum::debug_handler]
pub async fn delete_staff(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(staff_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    user.require_admin()?;

    let service = StaffService::new(&config);
    service
        .delete_staff(&user.owner_id, &staff_id, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({ "success": true })))
}
