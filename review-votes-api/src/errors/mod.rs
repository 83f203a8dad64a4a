//! Error types for the Review Votes API.
//! Covers startup failures, configuration problems and the error responses
//! the vote resource returns.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use review_votes_service::VoteServiceError;
use review_votes_shared::types::ErrorResponse;
use thiserror::Error;
use tracing::error;

/// Errors that prevent the server from starting or keep it from serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Repository error: {0}")]
    Repository(#[from] review_votes_repository::VotesRepositoryError),
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Invalid or missing configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Errors returned by the vote resource.
///
/// Store failures collapse into `Internal` so persistence details never reach
/// the response body; they are logged instead.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Authentication required")]
    AuthRequired,
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::AuthRequired => StatusCode::UNAUTHORIZED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<VoteServiceError> for ApiError {
    fn from(err: VoteServiceError) -> Self {
        match err {
            VoteServiceError::Validation(message) => ApiError::Validation(message),
            VoteServiceError::AuthRequired => ApiError::AuthRequired,
            VoteServiceError::Store(e) => {
                error!(error = %e, "Vote store failure");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    #[test]
    fn test_config_failure_is_a_startup_error() {
        let err: ServerError = ApiConfig::from_lookup(|_| None).unwrap_err().into();
        assert!(matches!(err, ServerError::Config(ConfigError::Missing("DATABASE_URL"))));
        assert_eq!(err.to_string(), "Configuration error: DATABASE_URL must be set");
    }
}
