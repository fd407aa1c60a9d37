use std::{env, time::Duration};

use secrecy::SecretString;

use crate::{
    errors::{AppError, AppResult},
    models::domain::session_context::UserRole,
};

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: SecretString,
    pub session_username: String,
    pub session_role: UserRole,
    pub request_timeout_secs: u64,
    pub tick_interval_ms: u64,
    pub low_time_warning_secs: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080/api".to_string()),
            api_token: SecretString::from(env::var("API_TOKEN").unwrap_or_default()),
            session_username: env::var("SESSION_USERNAME")
                .unwrap_or_else(|_| "student".to_string()),
            session_role: env::var("SESSION_ROLE")
                .ok()
                .and_then(|r| r.parse().ok())
                .unwrap_or(UserRole::Student),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(30),
            tick_interval_ms: env::var("TICK_INTERVAL_MS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(1000),
            low_time_warning_secs: env::var("LOW_TIME_WARNING_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(60),
        }
    }

    /// Rejects settings the HTTP client or the countdown cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        reqwest::Url::parse(&self.api_base_url).map_err(|e| {
            AppError::ValidationError(format!(
                "API_BASE_URL '{}' is not a valid URL: {}",
                self.api_base_url, e
            ))
        })?;

        if self.request_timeout_secs == 0 {
            return Err(AppError::ValidationError(
                "REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        if self.tick_interval_ms == 0 {
            return Err(AppError::ValidationError(
                "TICK_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080/api".to_string(),
            api_token: SecretString::from("test-token".to_string()),
            session_username: "teststudent".to_string(),
            session_role: UserRole::Student,
            request_timeout_secs: 5,
            tick_interval_ms: 1000,
            low_time_warning_secs: 60,
        }
    }
}
