use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn branch_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_branch))
        .route("/", get(handlers::list_branches))
        .route("/{branch_id}", get(handlers::get_branch))
        .route("/{branch_id}", put(handlers::update_branch))
        .route("/{branch_id}", delete(handlers::delete_branch))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
