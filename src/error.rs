use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// CRM errors
    #[error("CRM error: {0}")]
    Crm(#[from] CrmError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Unauthorized access errors
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rejected upload
    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    /// Upload over the configured size limit
    #[error("File too large: {size} bytes (max {max})")]
    FileTooLarge { size: usize, max: usize },

    /// External service errors (AI, geocoding)
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Message(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Check if error is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Get HTTP status code for the error
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound(_) => 404,
            AppError::Unauthorized(_) => 401,
            AppError::Validation(_) | AppError::InvalidFileType(_) => 400,
            AppError::FileTooLarge { .. } => 413,
            AppError::Crm(_) | AppError::ExternalService(_) => 502,
            AppError::Config(_) => 500,
            _ => 500,
        }
    }

    /// Downgrade to the message shown to portal users.
    ///
    /// Validation and upload problems are the user's to fix, so their detail
    /// is kept. Everything else collapses to `fallback`.
    pub fn into_api_error(self, fallback: &str) -> ApiError {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = match &self {
            AppError::Validation(msg) => msg.clone(),
            AppError::InvalidFileType(_) => "Invalid file type".to_string(),
            AppError::FileTooLarge { .. } => "File too large".to_string(),
            AppError::Unauthorized(_) => "Not authenticated".to_string(),
            _ => fallback.to_string(),
        };

        if status.is_server_error() {
            error!("{}: {}", fallback, self);
        } else {
            warn!("{}: {}", fallback, self);
        }

        ApiError { status, message }
    }
}

/// CRM-specific error types
#[derive(Error, Debug)]
pub enum CrmError {
    /// Transport failure talking to the CRM
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success status from the CRM
    #[error("CRM returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid input for a create call
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for CRM operations
pub type CrmResult<T> = Result<T, CrmError>;

/// User-facing error returned by HTTP handlers
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Not authenticated")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}
