use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use doctor_cell::router::{doctor_routes, schedule_routes};
use place_cell::router::place_routes;
use shared_database::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Carelink API is running!" }))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/schedules", schedule_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/places", place_routes(state))
}
