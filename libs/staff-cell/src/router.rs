use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn staff_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_staff))
        .route("/", get(handlers::list_staff))
        .route("/{staff_id}", get(handlers::get_staff))
        .route("/{staff_id}", put(handlers::update_staff))
        .route("/{staff_id}", delete(handlers::delete_staff))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
