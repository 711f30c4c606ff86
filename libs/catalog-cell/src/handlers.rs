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

use crate::models::{
    CreateCategoryRequest, CreateServiceRequest, ServiceListQuery, UpdateServiceRequest,
};
use crate::services::CatalogService;

/// PostgREST reports unique-key violations as 409; the client surfaces
/// them with a "Duplicate key" prefix.
fn map_write_error(err: anyhow::Error, duplicate_message: &str) -> AppError {
    let text = err.to_string();
    if text.starts_with("Duplicate key") {
        AppError::BadRequest(duplicate_message.to_string())
    } else {
        AppError::Internal(text)
    }
}

#[axum::debug_handler]
pub async fn create_category(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    user.require_admin()?;

    if request.name.trim().is_empty() {
        return Err(AppError::ValidationError("Category name is required".to_string()));
    }

    let service = CatalogService::new(&config);
    let category = service
        .create_category(&user.owner_id, request, auth.token())
        .await
        .map_err(|e| map_write_error(e, "A category with this name already exists"))?;

    Ok((StatusCode::CREATED, Json(json!(category))))
}

#[axum::debug_handler]
pub async fn list_categories(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(&config);
    let categories = service
        .list_categories(&user.owner_id, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "categories": categories,
        "total": categories.len()
    })))
}

#[axum::debug_handler]
pub async fn delete_category(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(category_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    user.require_admin()?;

    let service = CatalogService::new(&config);
    service
        .delete_category(&user.owner_id, &category_id, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn create_service(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    user.require_admin()?;

    if request.name.trim().is_empty() {
        return Err(AppError::ValidationError("Service name is required".to_string()));
    }
    if request.category.trim().is_empty() {
        return Err(AppError::ValidationError("Category is required".to_string()));
    }

    let service = CatalogService::new(&config);
    let created = service
        .create_service(&user.owner_id, request, auth.token())
        .await
        .map_err(|e| map_write_error(e, "A service with this name already exists"))?;

    Ok((StatusCode::CREATED, Json(json!(created))))
}

#[axum::debug_handler]
pub async fn list_services(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(query): Query<ServiceListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(&config);
    let services = service
        .list_services(&user.owner_id, query.category.as_deref(), auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "services": services,
        "total": services.len()
    })))
}

#[axum::debug_handler]
pub async fn get_service(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(service_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(&config);
    let item = service
        .get_service(&user.owner_id, &service_id, auth.token())
        .await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    Ok(Json(json!(item)))
}

#[axum::debug_handler]
pub async fn update_service(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(service_id): Path<String>,
    Json(request): Json<UpdateServiceRequest>,
) -> Result<Json<Value>, AppError> {
    user.require_admin()?;

    let service = CatalogService::new(&config);
    let item = service
        .update_service(&user.owner_id, &service_id, request, auth.token())
        .await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    Ok(Json(json!(item)))
}

#[axum::debug_handler]
pub async fn delete_service(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(service_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    user.require_admin()?;

    let service = CatalogService::new(&config);
    service
        .delete_service(&user.owner_id, &service_id, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({ "success": true })))
}
