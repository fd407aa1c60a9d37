use reqwest::RequestBuilder;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::SessionContext,
};

/// Which user flow a request belongs to; decides the error a failure surfaces as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Load,
    Submit,
}

/// Error payload written by the backend's exception handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub suspended: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    Transport(String),
    Status { status: u16, body: ErrorBody },
    Decode(String),
}

impl ApiFailure {
    /// The backend reports missing and unpublished quizzes as 400 with a message,
    /// so those count alongside a real 404 or a role rejection.
    pub fn is_not_found(&self) -> bool {
        match self {
            ApiFailure::Status { status: 404, .. } => true,
            ApiFailure::Status { status: 403, body } => !body.suspended,
            ApiFailure::Status { status: 400, body } => body.message.as_deref().is_some_and(|m| {
                let m = m.to_lowercase();
                m.contains("not found") || m.contains("not available")
            }),
            _ => false,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ApiFailure::Status { body, .. } => body.message.as_deref(),
            _ => None,
        }
    }

    pub fn into_app_error(self, kind: RequestKind, what: &str) -> AppError {
        if let ApiFailure::Status { status, body } = &self {
            let message = body
                .message
                .clone()
                .unwrap_or_else(|| format!("{} returned HTTP {}", what, status));
            if *status == 401 {
                return AppError::Unauthorized(message);
            }
            if *status == 403 && body.suspended {
                return AppError::Suspended(message);
            }
            if kind == RequestKind::Load && self.is_not_found() {
                return AppError::NotFound(format!("{}: {}", what, message));
            }
        }

        let detail = match self {
            ApiFailure::Transport(e) => format!("{}: {}", what, e),
            ApiFailure::Status { status, body } => format!(
                "{}: HTTP {}{}",
                what,
                status,
                body.message.map(|m| format!(" ({})", m)).unwrap_or_default()
            ),
            ApiFailure::Decode(e) => format!("{}: unexpected response: {}", what, e),
        };

        match kind {
            RequestKind::Load => AppError::LoadError(detail),
            RequestKind::Submit => AppError::SubmitError(detail),
        }
    }
}

/// Thin JSON client for the learning platform REST API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    context: SessionContext,
}

impl ApiClient {
    pub fn new(config: &Config, context: SessionContext) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        log::debug!(
            "API client for {} as '{}' ({})",
            config.api_base_url,
            context.username,
            context.role
        );

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            context,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiFailure> {
        self.send(self.http.get(self.url(path))).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiFailure>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiFailure> {
        let request = match self.context.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str::<ErrorBody>(&text).unwrap_or_else(|_| ErrorBody {
                message: (!text.trim().is_empty()).then(|| text.trim().to_string()),
                suspended: false,
            });
            log::warn!(
                "Request failed with HTTP {}: {}",
                status.as_u16(),
                body.message.as_deref().unwrap_or("no message")
            );
            return Err(ApiFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiFailure::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16, message: Option<&str>, suspended: bool) -> ApiFailure {
        ApiFailure::Status {
            status,
            body: ErrorBody {
                message: message.map(str::to_string),
                suspended,
            },
        }
    }

    #[test]
    fn url_joins_without_double_slashes() {
        let mut config = Config::test_config();
        config.api_base_url = "http://localhost:8080/api/".to_string();
        let client = ApiClient::new(&config, SessionContext::from_config(&config)).unwrap();

        assert_eq!(client.url("/student/quiz/3"), "http://localhost:8080/api/student/quiz/3");
        assert_eq!(client.url("student/quiz"), "http://localhost:8080/api/student/quiz");
    }

    #[test]
    fn not_found_covers_missing_and_unpublished_quizzes() {
        assert!(status(404, None, false).is_not_found());
        assert!(status(403, Some("Access denied"), false).is_not_found());
        assert!(status(400, Some("Quiz not found"), false).is_not_found());
        assert!(status(400, Some("Quiz is not available"), false).is_not_found());
        assert!(!status(400, Some("Invalid answer option"), false).is_not_found());
        assert!(!status(500, Some("boom"), false).is_not_found());
        assert!(!status(403, Some("suspended"), true).is_not_found());
    }

    #[test]
    fn load_failures_map_to_load_taxonomy() {
        assert!(matches!(
            status(404, None, false).into_app_error(RequestKind::Load, "quiz 1"),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            status(503, None, false).into_app_error(RequestKind::Load, "quiz 1"),
            AppError::LoadError(_)
        ));
        assert!(matches!(
            ApiFailure::Transport("connection refused".into()).into_app_error(RequestKind::Load, "quiz 1"),
            AppError::LoadError(_)
        ));
    }

    #[test]
    fn submit_failures_are_retryable_submit_errors() {
        let err = status(500, Some("An error occurred"), false).into_app_error(RequestKind::Submit, "quiz 1");
        assert!(matches!(err, AppError::SubmitError(_)));
        assert!(err.is_retryable());

        let err = status(400, Some("Quiz not found"), false).into_app_error(RequestKind::Submit, "quiz 1");
        assert!(matches!(err, AppError::SubmitError(_)));
    }

    #[test]
    fn auth_failures_win_over_request_kind() {
        assert!(matches!(
            status(401, None, false).into_app_error(RequestKind::Submit, "quiz 1"),
            AppError::Unauthorized(_)
        ));
        assert!(matches!(
            status(403, Some("Your account has been suspended"), true).into_app_error(RequestKind::Load, "quiz 1"),
            AppError::Suspended(_)
        ));
    }
}
