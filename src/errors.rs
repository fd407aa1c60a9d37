use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to load quiz: {0}")]
    LoadError(String),

    #[error("Failed to submit quiz: {0}")]
    SubmitError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Account suspended: {0}")]
    Suspended(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::LoadError(_) => "LOAD_ERROR",
            AppError::SubmitError(_) => "SUBMIT_ERROR",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Suspended(_) => "SUSPENDED",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Short message suitable for the notification popup.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "This quiz is not available",
            AppError::LoadError(_) => "Failed to load quiz, please try again",
            AppError::SubmitError(_) => "Failed to submit quiz, please try again",
            AppError::ValidationError(_) => "The request was invalid",
            AppError::Unauthorized(_) => "Please sign in again",
            AppError::Suspended(_) => "Your account has been suspended",
            AppError::InternalError(_) => "Something went wrong",
        }
    }

    /// Whether the user may simply try the same operation again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::LoadError(_) | AppError::SubmitError(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::InternalError(format!("HTTP client error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
