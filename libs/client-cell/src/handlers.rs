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

use crate::models::{ClientListQuery, CreateClientRequest, UpdateClientRequest};
use crate::services::ClientService;

fn map_write_error(err: anyhow::Error) -> AppError {
    let text = err.to_string();
    if text.starts_with("Duplicate key") {
        AppError::BadRequest("A client with this phone number already exists".to_string())
    } else {
        AppError::Internal(text)
    }
}

#[axum::debug_handler]
pub async fn create_client(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::ValidationError("Client name is required".to_string()));
    }
    if request.phone.trim().is_empty() {
        return Err(AppError::ValidationError("Phone number is required".to_string()));
    }

    let service = ClientService::new(&config);
    let client = service
        .create_client(&user.owner_id, request, auth.token())
        .await
        .map_err(map_write_error)?;

    Ok((StatusCode::CREATED, Json(json!(client))))
}

#[axum::debug_handler]
pub async fn get_client(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(client_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = ClientService::new(&config);
    let client = service
        .get_client(&user.owner_id, &client_id, auth.token())
        .await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    Ok(Json(json!(client)))
}

#[axum::debug_handler]
pub async fn list_clients(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(query): Query<ClientListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = ClientService::new(&config);
    let clients = service
        .list_clients(&user.owner_id, query.search.as_deref(), auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "clients": clients,
        "total": clients.len()
    })))
}

#[axum::debug_handler]
pub async fn update_client(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(client_id): Path<String>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ClientService::new(&config);
    let client = service
        .update_client(&user.owner_id, &client_id, request, auth.token())
        .await
        .map_err(map_write_error)?;

    Ok(Json(json!(client)))
}

#[axum::debug_handler]
pub async fn delete_client(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(client_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    user.require_admin()?;

    let service = ClientService::new(&config);
    service
        .delete_client(&user.owner_id, &client_id, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({ "success": true })))
}
