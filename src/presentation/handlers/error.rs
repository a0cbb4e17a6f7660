use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::{RepositoryError, TranscriptionError};
use crate::application::services::{LedgerError, PipelineError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Caller-facing failure of any endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(e) => pipeline_status(e),
            ApiError::Ledger(LedgerError::UnknownUser(_)) => StatusCode::UNAUTHORIZED,
            ApiError::Ledger(LedgerError::InsufficientMinutes { .. }) => {
                StatusCode::PAYMENT_REQUIRED
            }
            ApiError::Ledger(LedgerError::Storage(_)) | ApiError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        match self {
            // Unknown accounts are indistinguishable from a missing session.
            ApiError::Pipeline(PipelineError::UnknownUser(_))
            | ApiError::Ledger(LedgerError::UnknownUser(_)) => {
                ApiError::Unauthenticated.to_string()
            }
            other => other.to_string(),
        }
    }
}

fn pipeline_status(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::EmptyUpload => StatusCode::BAD_REQUEST,
        PipelineError::UnknownUser(_) => StatusCode::UNAUTHORIZED,
        PipelineError::QuotaExceeded { .. } => StatusCode::PAYMENT_REQUIRED,
        PipelineError::Conversion(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineError::Transcription(TranscriptionError::MissingApiKey) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        PipelineError::Transcription(TranscriptionError::Provider { .. }) => {
            StatusCode::BAD_GATEWAY
        }
        PipelineError::Transcription(TranscriptionError::Timeout(_)) => {
            StatusCode::GATEWAY_TIMEOUT
        }
        PipelineError::Transcription(TranscriptionError::Transport(_)) => StatusCode::BAD_GATEWAY,
        PipelineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
