use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn place_routes(state: Arc<AppState>) -> Router {
    // Directory reads are public; the moderation queue and every mutation
    // require authentication
    let public_routes = Router::new()
        .route("/", get(handlers::list_approved_places))
        .route("/{place_id}", get(handlers::get_place))
        .route("/classification/{classification}", get(handlers::list_places_by_classification))
        .route("/{place_id}/ratings", get(handlers::get_average_rating));

    let protected_routes = Router::new()
        .route("/", post(handlers::submit_place))
        .route("/pending", get(handlers::list_pending_places))
        .route("/{place_id}", put(handlers::update_place))
        .route("/{place_id}", delete(handlers::delete_place))
        .route("/{place_id}/confirm", post(handlers::confirm_place))
        .route("/{place_id}/reject", post(handlers::reject_place))
        .route("/{place_id}/ratings", post(handlers::create_rating))
        .route("/{place_id}/ratings", put(handlers::update_rating))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
