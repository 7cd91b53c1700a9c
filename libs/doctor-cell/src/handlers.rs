use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{
    CreateDoctorRequest, CreateScheduleRequest, DoctorError, UpdateDoctorRequest,
    UpdateScheduleRequest,
};
use crate::services::availability::AvailabilityService;
use crate::services::doctor::DoctorService;
use crate::services::schedule::ScheduleService;

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

fn to_app_error(err: DoctorError) -> AppError {
    match err {
        DoctorError::NotFound => AppError::NotFound("Doctor not found".to_string()),
        DoctorError::ScheduleNotFound => AppError::NotFound("Schedule not found".to_string()),
        DoctorError::NoScheduleForDay => {
            AppError::NotFound("No schedule for the requested day".to_string())
        }
        DoctorError::ScheduleExists => {
            AppError::Conflict("Schedule already exists for the given doctor and day".to_string())
        }
        DoctorError::ValidationError(msg) => AppError::ValidationError(msg),
        DoctorError::DatabaseError(msg) => AppError::Database(msg),
    }
}

// ==============================================================================
// DOCTOR DIRECTORY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state.pool);

    let doctor = service.create_doctor(request).await.map_err(to_app_error)?;

    Ok(Json(json!({
        "message": "Doctor created successfully",
        "doctor": doctor
    })))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state.pool);

    let doctor = service
        .update_doctor(doctor_id, request)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "message": "Doctor updated successfully",
        "doctor": doctor
    })))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state.pool);

    service.delete_doctor(doctor_id).await.map_err(to_app_error)?;

    Ok(Json(json!({
        "message": "Doctor deleted successfully"
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state.pool);

    let doctor = service.get_doctor(doctor_id).await.map_err(to_app_error)?;

    Ok(Json(json!({ "doctor": doctor })))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state.pool);

    let doctors = service.list_doctors().await.map_err(to_app_error)?;

    Ok(Json(json!({ "doctors": doctors })))
}

// ==============================================================================
// SCHEDULE HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateScheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state.pool);

    let schedule = service
        .create_schedule(request)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "message": "Schedule created successfully",
        "schedule": schedule
    })))
}

#[axum::debug_handler]
pub async fn update_schedule(
    State(state): State<Arc<AppState>>,
    Path(schedule_id): Path<Uuid>,
    Json(request): Json<UpdateScheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state.pool);

    let schedule = service
        .update_schedule(schedule_id, request)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "message": "Schedule updated successfully",
        "schedule": schedule
    })))
}

#[axum::debug_handler]
pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    Path(schedule_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state.pool);

    service
        .delete_schedule(schedule_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "message": "Schedule deleted successfully"
    })))
}

#[axum::debug_handler]
pub async fn get_doctor_schedules(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state.pool);

    let schedules = service
        .schedules_for_doctor(doctor_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({ "schedules": schedules })))
}

// ==============================================================================
// AVAILABILITY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state.pool);

    let slots = service
        .available_slots_for_date(doctor_id, query.date)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "date": query.date,
        "available_slots": slots
    })))
}
