use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::podcast::{ErrorKind, FailureReason, PodcastError, Stage, StageFailure};

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Podcast(#[from] PodcastError),

    #[error(transparent)]
    Generation(#[from] StageFailure),
}

/// Error response body: guidance message plus machine-readable classification
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: ErrorKind,
    pub reason: FailureReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
}

impl AppError {
    fn podcast_error(&self) -> &PodcastError {
        match self {
            Self::Podcast(e) => e,
            Self::Generation(failure) => &failure.error,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self.podcast_error() {
            PodcastError::Validation(_) => StatusCode::BAD_REQUEST,
            PodcastError::NotFound(_) => StatusCode::NOT_FOUND,
            PodcastError::NoDialogueFound => StatusCode::UNPROCESSABLE_ENTITY,
            PodcastError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            PodcastError::ProviderAuth(_)
            | PodcastError::InvalidVoiceIdentity(_)
            | PodcastError::ProviderEmptyResult(_) => StatusCode::BAD_GATEWAY,
            PodcastError::ProviderUnavailable(_)
            | PodcastError::ConfigurationMissing(_)
            | PodcastError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            PodcastError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let error = self.podcast_error();
        ErrorResponse {
            message: error.guidance(),
            code: error.kind(),
            reason: error.reason(),
            stage: match self {
                Self::Generation(failure) => Some(failure.stage),
                Self::Podcast(_) => None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Full error (with provider detail) goes to the log only
        let status = self.status_code();
        tracing::error!(
            error = %self,
            status = %status.as_u16(),
            "Request failed"
        );

        let error_response = self.to_response();

        (status, Json(error_response)).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
