use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from_address: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_URL not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            mail_api_url: env::var("MAIL_API_URL")
                .unwrap_or_else(|_| {
                    warn!("MAIL_API_URL not set, using empty value");
                    String::new()
                }),
            mail_api_key: env::var("MAIL_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("MAIL_API_KEY not set, using empty value");
                    String::new()
                }),
            mail_from_address: env::var("MAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| {
                    warn!("MAIL_FROM_ADDRESS not set, using default");
                    "no-reply@carelink.example".to_string()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.database_url.is_empty() && !self.jwt_secret.is_empty()
    }

    pub fn is_mailer_configured(&self) -> bool {
        !self.mail_api_url.is_empty() && !self.mail_api_key.is_empty()
    }
}
