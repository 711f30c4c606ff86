use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn inventory_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_item))
        .route("/", get(handlers::list_items))
        .route("/low-stock", get(handlers::list_low_stock))
        .route("/{item_id}", get(handlers::get_item))
        .route("/{item_id}", put(handlers::update_item))
        .route("/{item_id}", delete(handlers::delete_item))
        .route("/{item_id}/adjust", post(handlers::adjust_stock))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
