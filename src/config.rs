use std::env;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

pub const DEFAULT_MODEL_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_MODEL_NAME: &str = "gemini-2.5-flash";

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub model_api_key: SecretString,
    pub model_api_base: String,
    pub model_name: String,
    pub model_timeout_secs: u64,
    pub cors_allowed_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            model_api_key: SecretString::from(String::new()),
            model_api_base: DEFAULT_MODEL_API_BASE.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            model_timeout_secs: 60,
            cors_allowed_origin: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            web_server_host: env::var("WEB_SERVER_HOST").unwrap_or(defaults.web_server_host),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.web_server_port),
            model_api_key: env::var("MODEL_API_KEY")
                .map(SecretString::from)
                .unwrap_or(defaults.model_api_key),
            model_api_base: env::var("MODEL_API_BASE").unwrap_or(defaults.model_api_base),
            model_name: env::var("MODEL_NAME").unwrap_or(defaults.model_name),
            model_timeout_secs: env::var("MODEL_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(defaults.model_timeout_secs),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|o| !o.trim().is_empty()),
        }
    }

    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    /// Checks that the model provider can actually be reached with this configuration.
    pub fn validate_for_production(&self) -> AppResult<()> {
        if self.model_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::InternalError(
                "MODEL_API_KEY is not set".to_string(),
            ));
        }

        if self.model_name.trim().is_empty() {
            return Err(AppError::InternalError("MODEL_NAME is empty".to_string()));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            model_api_key: SecretString::from("test-api-key".to_string()),
            model_timeout_secs: 5,
            ..Self::default()
        }
    }
}
