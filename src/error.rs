use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use crate::models::ErrorBody;

/// Failures surfaced to API callers. The `Display` text becomes the
/// `detail` field of the error body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    Configuration(String),
    #[error("Invalid OpenAI API key")]
    Authentication,
    #[error("AI service error: {0}")]
    Provider(String),
}

impl ApiError {

    pub fn status_code(&self) -> StatusCode {

        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Authentication => StatusCode::UNAUTHORIZED,
            ApiError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }

    }

}

impl IntoResponse for ApiError {

    fn into_response(self) -> Response {

        let body = ErrorBody { detail: self.to_string() };
        (self.status_code(), Json(body)).into_response()

    }

}

/// Failures reported by a chat completion provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("provider returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("{0}")]
    Transport(String),
    #[error("malformed provider response: {0}")]
    Decode(String),
    #[error("provider returned no completion choices")]
    EmptyChoices,
}

impl From<ProviderError> for ApiError {

    fn from(err: ProviderError) -> Self {

        match err {
            ProviderError::Authentication(_) => ApiError::Authentication,
            other => ApiError::Provider(other.to_string()),
        }

    }

}
