use notification_cell::Mailer;
use shared_config::AppConfig;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mailer_config(api_url: &str) -> AppConfig {
    AppConfig {
        database_url: String::new(),
        jwt_secret: String::new(),
        mail_api_url: api_url.to_string(),
        mail_api_key: "test-mail-key".to_string(),
        mail_from_address: "no-reply@carelink.test".to_string(),
    }
}

#[tokio::test]
async fn send_posts_message_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("Authorization", "Bearer test-mail-key"))
        .and(body_partial_json(serde_json::json!({
            "to": "parent@example.com",
            "subject": "Place approved",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "msg-1", "status": "queued"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mailer = Mailer::new(&mailer_config(&mock_server.uri()));

    let result = mailer
        .send("parent@example.com", "Place approved", "Your place is now listed.")
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn send_surfaces_api_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .mount(&mock_server)
        .await;

    let mailer = Mailer::new(&mailer_config(&mock_server.uri()));

    let result = mailer.send("parent@example.com", "subject", "body").await;

    assert!(result.is_err());
}

#[tokio::test]
async fn unconfigured_mailer_short_circuits() {
    let mailer = Mailer::new(&mailer_config(""));

    assert!(!mailer.is_configured());
    // No server is listening anywhere; this only passes because the send
    // short-circuits before any request is made.
    let result = mailer.send("parent@example.com", "subject", "body").await;
    assert!(result.is_ok());
}
