use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{ReportPeriod, ReportQuery};
use crate::services::ReportService;

#[axum::debug_handler]
pub async fn get_summary(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Value>, AppError> {
    let branch_scope = user.resolve_branch_scope(query.branch_id.as_deref())?;
    let period = ReportPeriod::parse(query.period.as_deref());

    let service = ReportService::new(&config);
    let summary = service
        .summary(&user.owner_id, branch_scope.as_deref(), period, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(summary)))
}
