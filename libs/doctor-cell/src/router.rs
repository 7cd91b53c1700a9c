use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppState>) -> Router {
    // Directory reads and slot lookups are public; mutations require auth
    let public_routes = Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/{doctor_id}/schedules", get(handlers::get_doctor_schedules))
        .route("/{doctor_id}/slots", get(handlers::get_available_slots));

    let protected_routes = Router::new()
        .route("/", post(handlers::create_doctor))
        .route("/{doctor_id}", put(handlers::update_doctor))
        .route("/{doctor_id}", delete(handlers::delete_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

pub fn schedule_routes(state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::create_schedule))
        .route("/{schedule_id}", put(handlers::update_schedule))
        .route("/{schedule_id}", delete(handlers::delete_schedule))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(state)
}
