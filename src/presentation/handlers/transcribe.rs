use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;

use crate::domain::{AuthenticatedUser, UploadArtifact};
use crate::presentation::state::AppState;

use super::ApiError;

const FILE_FIELD: &str = "file";
const LANGUAGE_FIELD: &str = "language";
const DEFAULT_UPLOAD_NAME: &str = "upload";

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
    pub format: String,
    pub minutes_charged: f64,
    pub minutes_remaining: f64,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let mut upload: Option<UploadArtifact> = None;
    let mut language: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            FILE_FIELD => {
                let filename = field
                    .file_name()
                    .filter(|f| !f.is_empty())
                    .unwrap_or(DEFAULT_UPLOAD_NAME)
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;

                tracing::debug!(filename = %filename, bytes = data.len(), "File data received");
                upload = Some(UploadArtifact::new(data.to_vec(), filename));
            }
            LANGUAGE_FIELD => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read language: {}", e)))?;
                language = Some(value.trim().to_string()).filter(|l| !l.is_empty());
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unexpected multipart field");
            }
        }
    }

    let Some(upload) = upload else {
        tracing::warn!("Transcription request with no file");
        return Err(ApiError::BadRequest("No file uploaded".to_string()));
    };

    let output = state
        .transcription_service
        .process(&user, upload, language.as_deref())
        .await?;

    Ok(Json(TranscribeResponse {
        text: output.text,
        format: output.format.to_string(),
        minutes_charged: output.minutes_charged,
        minutes_remaining: output.minutes_remaining,
    }))
}
