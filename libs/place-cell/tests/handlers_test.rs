use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use place_cell::router::place_routes;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

#[tokio::test]
async fn submission_requires_a_token() {
    let config = TestConfig::default();
    let app = place_routes(config.to_state());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn pending_queue_requires_a_token() {
    let config = TestConfig::default();
    let app = place_routes(config.to_state());

    let response = app
        .oneshot(Request::builder().uri("/pending").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn submission_fields_are_validated_before_any_write() {
    let config = TestConfig::default();
    let app = place_routes(config.to_state());

    let user = TestUser::default();
    let token = JwtTestUtils::create_valid_token(&user, &config.jwt_secret);

    // Blank name fails the required-field check
    let body = serde_json::json!({
        "name": "  ",
        "classification": "daycare",
        "region": "North",
        "city": "Springfield",
        "location": "12 Main St"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rating_value_is_bounded() {
    let config = TestConfig::default();
    let app = place_routes(config.to_state());

    let user = TestUser::default();
    let token = JwtTestUtils::create_valid_token(&user, &config.jwt_secret);

    let body = serde_json::json!({ "rating_value": 9 });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/7e3de5ab-7b3a-4a45-8a7c-2f3f69a63dd8/ratings")
                .header("content-type", "application/json")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    // Rejected by bounds validation before the pool is ever touched
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
