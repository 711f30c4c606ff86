use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use branch_cell::router::branch_routes;
use catalog_cell::router::catalog_routes;
use client_cell::router::client_routes;
use expense_cell::router::expense_routes;
use inventory_cell::router::inventory_routes;
use report_cell::router::report_routes;
use shared_config::AppConfig;
use staff_cell::router::staff_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Salon API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/branches", branch_routes(state.clone()))
        .nest("/staff", staff_routes(state.clone()))
        .nest("/services", catalog_routes(state.clone()))
        .nest("/clients", client_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/inventory", inventory_routes(state.clone()))
        .nest("/expenses", expense_routes(state.clone()))
        .nest("/reports", report_routes(state))
}
