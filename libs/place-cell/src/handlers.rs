use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use notification_cell::Mailer;
use shared_database::AppState;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{PlaceError, RatingRequest, SubmitPlaceRequest, UpdatePlaceRequest};
use crate::services::moderation::ModerationService;
use crate::services::rating::RatingService;

fn to_app_error(err: PlaceError) -> AppError {
    match err {
        PlaceError::NotFound => AppError::NotFound("Place not found".to_string()),
        PlaceError::DuplicateRating => AppError::Conflict(err.to_string()),
        PlaceError::RatingNotFound => AppError::NotFound("Rating not found".to_string()),
        PlaceError::InvalidStatusTransition(_) => AppError::Conflict(err.to_string()),
        PlaceError::ValidationError(msg) => AppError::ValidationError(msg),
        PlaceError::DatabaseError(msg) => AppError::Database(msg),
    }
}

fn moderation_service(state: &AppState) -> ModerationService {
    ModerationService::new(&state.pool, Mailer::new(&state.config))
}

fn caller_id(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id)
        .map_err(|_| AppError::Auth("Invalid user id in token".to_string()))
}

// ==============================================================================
// MODERATION HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn submit_place(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<SubmitPlaceRequest>,
) -> Result<Json<Value>, AppError> {
    let owner_user_id = caller_id(&user)?;
    let service = moderation_service(&state);

    let place = service
        .submit_place(owner_user_id, user.role.as_deref(), request)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "message": "Place created successfully",
        "place": place
    })))
}

#[axum::debug_handler]
pub async fn confirm_place(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = moderation_service(&state);

    let place = service.confirm_place(place_id).await.map_err(to_app_error)?;

    Ok(Json(json!({
        "message": "Place approved successfully",
        "place": place
    })))
}

#[axum::debug_handler]
pub async fn reject_place(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = moderation_service(&state);

    service.reject_place(place_id).await.map_err(to_app_error)?;

    Ok(Json(json!({
        "message": "Place rejected successfully"
    })))
}

#[axum::debug_handler]
pub async fn delete_place(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = moderation_service(&state);

    service.delete_place(place_id).await.map_err(to_app_error)?;

    Ok(Json(json!({
        "message": "Place deleted successfully"
    })))
}

#[axum::debug_handler]
pub async fn update_place(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<Uuid>,
    Json(request): Json<UpdatePlaceRequest>,
) -> Result<Json<Value>, AppError> {
    let service = moderation_service(&state);

    let place = service
        .update_place(place_id, request)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "message": "Place updated successfully",
        "place": place
    })))
}

#[axum::debug_handler]
pub async fn get_place(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = moderation_service(&state);

    let place = service.get_place(place_id).await.map_err(to_app_error)?;

    Ok(Json(json!({ "place": place })))
}

#[axum::debug_handler]
pub async fn list_approved_places(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = moderation_service(&state);

    let places = service.list_approved_places().await.map_err(to_app_error)?;

    Ok(Json(json!({ "places": places })))
}

#[axum::debug_handler]
pub async fn list_pending_places(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = moderation_service(&state);

    let places = service.list_pending_places().await.map_err(to_app_error)?;

    Ok(Json(json!({ "places": places })))
}

#[axum::debug_handler]
pub async fn list_places_by_classification(
    State(state): State<Arc<AppState>>,
    Path(classification): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = moderation_service(&state);

    let places = service
        .list_places_by_classification(&classification)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({ "places": places })))
}

// ==============================================================================
// RATING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_rating(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(place_id): Path<Uuid>,
    Json(request): Json<RatingRequest>,
) -> Result<Json<Value>, AppError> {
    let user_id = caller_id(&user)?;
    let service = RatingService::new(&state.pool);

    let rating = service
        .create_rating(place_id, user_id, request.rating_value)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "message": "Rating created successfully",
        "rating": rating
    })))
}

#[axum::debug_handler]
pub async fn update_rating(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(place_id): Path<Uuid>,
    Json(request): Json<RatingRequest>,
) -> Result<Json<Value>, AppError> {
    let user_id = caller_id(&user)?;
    let service = RatingService::new(&state.pool);

    let rating = service
        .update_rating(place_id, user_id, request.rating_value)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "message": "Rating updated successfully",
        "rating": rating
    })))
}

#[axum::debug_handler]
pub async fn get_average_rating(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = RatingService::new(&state.pool);

    let average = service
        .average_rating(place_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({ "average_rating": average })))
}
