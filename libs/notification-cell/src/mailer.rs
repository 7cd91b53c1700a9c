use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde_json::json;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Client for the transactional-mail HTTP API. Callers treat delivery as
/// best-effort: a failed send is logged, never propagated into a committed
/// transaction.
#[derive(Clone)]
pub struct Mailer {
    client: Client,
    api_url: String,
    api_key: String,
    from_address: String,
}

impl Mailer {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.mail_api_url.clone(),
            api_key: config.mail_api_key.clone(),
            from_address: config.mail_from_address.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_url.is_empty() && !self.api_key.is_empty()
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }

        headers
    }

    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        if !self.is_configured() {
            debug!("Mailer not configured, skipping notification to {}", to);
            return Ok(());
        }

        let url = format!("{}/messages", self.api_url);
        debug!("Sending notification to {} via {}", to, url);

        let payload = json!({
            "from": self.from_address,
            "to": to,
            "subject": subject,
            "text": body,
        });

        let response = self
            .client
            .post(&url)
            .headers(self.get_headers())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Mail API error ({}): {}", status, error_text);
            return Err(anyhow!("Mail API error ({}): {}", status, error_text));
        }

        debug!("Notification sent to {}", to);
        Ok(())
    }
}
