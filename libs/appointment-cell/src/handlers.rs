use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{AppointmentError, BookAppointmentRequest};
use crate::services::booking::BookingService;

fn to_app_error(err: AppointmentError) -> AppError {
    match err {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
        AppointmentError::DuplicateBooking
        | AppointmentError::SlotConflict => AppError::Conflict(err.to_string()),
        AppointmentError::OutsideSchedule => AppError::BadRequest(err.to_string()),
        AppointmentError::InvalidStatusTransition(_) => AppError::Conflict(err.to_string()),
        AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
        AppointmentError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    // Only the user themselves or an admin can book on their behalf
    let is_self = request.user_id.to_string() == user.id;
    if !is_self && !user.is_admin() {
        return Err(AppError::Auth(
            "Not authorized to book an appointment for this user".to_string(),
        ));
    }

    let service = BookingService::new(&state.pool);

    let appointment = service
        .book_appointment(request)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "message": "Appointment created successfully",
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state.pool);

    let appointment = service
        .cancel_appointment(appointment_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "message": "Appointment cancelled successfully",
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state.pool);

    let appointment = service
        .get_appointment(appointment_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({ "appointment": appointment })))
}

#[axum::debug_handler]
pub async fn get_user_appointments(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state.pool);

    let appointments = service
        .appointments_for_user(user_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn get_doctor_appointments(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state.pool);

    let appointments = service
        .appointments_for_doctor(doctor_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state.pool);

    service
        .delete_appointment(appointment_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "message": "Appointment deleted successfully"
    })))
}
