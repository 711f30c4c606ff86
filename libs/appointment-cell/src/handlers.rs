use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    AppointmentListQuery, AvailableSlotsQuery, BookAppointmentRequest, BookingError,
    UpdateStatusRequest,
};
use crate::services::booking::BookingService;

fn map_booking_error(error: BookingError) -> AppError {
    match error {
        BookingError::Validation(msg) => AppError::ValidationError(msg),
        BookingError::InvalidTime(_)
        | BookingError::StaffDayOff { .. }
        | BookingError::OutsideWorkingHours { .. }
        | BookingError::StaffAlreadyBooked { .. } => AppError::BadRequest(error.to_string()),
        BookingError::BranchNotFound | BookingError::NotFound => {
            AppError::NotFound(error.to_string())
        }
        BookingError::Database(msg) => AppError::Database(msg),
    }
}

/// Public booking endpoint used by the customer-facing site; no session is
/// required, the branch id in the body pins the tenant.
#[axum::debug_handler]
pub async fn book_appointment(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = BookingService::new(&config);

    let appointment = service
        .book_appointment(request, None)
        .await
        .map_err(map_booking_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "appointment": appointment,
            "message": "Appointment booked successfully"
        })),
    ))
}

/// Public slot listing for the booking widget.
#[axum::debug_handler]
pub async fn get_available_slots(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&config);

    let slots = service
        .available_slots(query, None)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!(slots)))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Value>, AppError> {
    let branch = user.resolve_branch_scope(query.branch_id.as_deref())?;
    let service = BookingService::new(&config);

    let appointments = service
        .list_appointments(
            &user.owner_id,
            branch.as_deref(),
            query.status,
            Some(auth.token()),
        )
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&config);

    let appointment = service
        .get_appointment(&user.owner_id, appointment_id, Some(auth.token()))
        .await
        .map_err(map_booking_error)?;

    user.resolve_branch_scope(Some(&appointment.branch_id))?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&config);

    // Scope check against the stored record before writing.
    let existing = service
        .get_appointment(&user.owner_id, appointment_id, Some(auth.token()))
        .await
        .map_err(map_booking_error)?;
    user.resolve_branch_scope(Some(&existing.branch_id))?;

    let appointment = service
        .update_status(
            &user.owner_id,
            appointment_id,
            request.status,
            Some(auth.token()),
        )
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}
