use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use doctor_cell::router::{doctor_routes, schedule_routes};
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

#[tokio::test]
async fn mutations_require_a_token() {
    let config = TestConfig::default();
    let app = doctor_routes(config.to_state());

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
async fn tampered_token_is_rejected() {
    let config = TestConfig::default();
    let app = doctor_routes(config.to_state());

    let user = TestUser::default();
    let mut token = JwtTestUtils::create_valid_token(&user, &config.jwt_secret);
    token.push('x');

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let config = TestConfig::default();
    let app = schedule_routes(config.to_state());

    let user = TestUser::new("doctor@example.com", "doctor");
    let token = JwtTestUtils::create_expired_token(&user, &config.jwt_secret);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn schedule_day_of_week_is_validated_before_any_write() {
    let config = TestConfig::default();
    let app = schedule_routes(config.to_state());

    let user = TestUser::new("doctor@example.com", "doctor");
    let token = JwtTestUtils::create_valid_token(&user, &config.jwt_secret);

    let body = serde_json::json!({
        "doctor_id": "7e3de5ab-7b3a-4a45-8a7c-2f3f69a63dd8",
        "day_of_week": 9,
        "start_time": "08:00:00",
        "end_time": "12:00:00",
        "slot_duration_minutes": 30
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

    // Rejected by field validation before the pool is ever touched
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn slots_route_requires_a_date() {
    let config = TestConfig::default();
    let app = doctor_routes(config.to_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/7e3de5ab-7b3a-4a45-8a7c-2f3f69a63dd8/slots")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
