use app_provider::{ErrorDetails, ProviderError};
use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use super::ApiResponse;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("TikTok URL is required")]
    MissingUrl { example: String },
    #[error("Invalid query string")]
    Query(#[from] QueryRejection),
    #[error("Failed to process TikTok URL")]
    ProviderFailure(ErrorDetails),
    #[error("Internal server error")]
    Provider(#[from] ProviderError),
    #[error("Endpoint not found")]
    NotFound,
    #[error("Something went wrong!")]
    Panic,
}

impl RelayError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingUrl { .. } => StatusCode::BAD_REQUEST,
            Self::Query(rejection) => rejection.status(),
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ProviderFailure(_) | Self::Provider(_) | Self::Panic => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

impl From<RelayError> for ErrorBody {
    fn from(err: RelayError) -> Self {
        let mut body = Self {
            error: err.to_string(),
            example: None,
            message: None,
            details: None,
        };

        match err {
            RelayError::MissingUrl { example } => body.example = Some(example),
            RelayError::Query(rejection) => body.message = Some(rejection.body_text()),
            RelayError::ProviderFailure(details) => body.details = Some(details),
            RelayError::Provider(err) => body.message = Some(err.to_string()),
            RelayError::NotFound | RelayError::Panic => {}
        }

        body
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        ApiResponse::new(status_code, ErrorBody::from(self)).into_response()
    }
}
