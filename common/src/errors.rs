use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Message returned to callers for any 5xx that carries no stage context.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Structured error types for the city information service
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Malformed request body: {0}")]
    MalformedInput(String),

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// An upstream fault tagged with the stage that was being performed.
    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: Box<AppError>,
    },

    #[error("Internal error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::HttpError {
            status,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::TimeoutError(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// Wrap an error raised while talking to an upstream service.
    pub fn upstream(context: &'static str, source: AppError) -> Self {
        Self::Upstream {
            context,
            source: Box::new(source),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) | AppError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            AppError::TimeoutError(_)
            | AppError::HttpError { .. }
            | AppError::NetworkError(_)
            | AppError::ParseError(_)
            | AppError::Upstream { .. }
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message exposed in the response body. Server-side faults never
    /// leak upstream details.
    fn public_message(&self) -> String {
        match self {
            AppError::NotFound(message)
            | AppError::ValidationError(message)
            | AppError::MalformedInput(message) => message.clone(),
            AppError::Upstream { context, .. } => (*context).to_string(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: self.public_message(),
        });

        (status, body).into_response()
    }
}
