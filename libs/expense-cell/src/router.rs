use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn expense_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_expense))
        .route("/", get(handlers::list_expenses))
        .route("/{expense_id}", get(handlers::get_expense))
        .route("/{expense_id}", put(handlers::update_expense))
        .route("/{expense_id}", delete(handlers::delete_expense))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
