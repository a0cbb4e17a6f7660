use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::mime_for_filename;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "whisper-1";

pub struct OpenAiWhisperEngine {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenAiWhisperEngine {
    pub fn new(
        api_key: Option<String>,
        base_url: Option<String>,
        model: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TranscriptionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranscriptionError::Transport(format!("client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> TranscriptionError {
        if err.is_timeout() {
            TranscriptionError::Timeout(self.timeout)
        } else {
            TranscriptionError::Transport(err.to_string())
        }
    }
}

#[derive(Deserialize)]
struct WhisperTranscriptionResponse {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl TranscriptionEngine for OpenAiWhisperEngine {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        filename: &str,
        language: Option<&str>,
    ) -> Result<String, TranscriptionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TranscriptionError::MissingApiKey)?;

        let url = format!("{}/audio/transcriptions", self.base_url.trim_end_matches('/'));

        let file_part = multipart::Part::bytes(audio_data.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime_for_filename(filename))
            .map_err(|e| TranscriptionError::Transport(format!("mime: {}", e)))?;

        let mut form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "json");

        if let Some(language) = language.map(str::trim).filter(|l| !l.is_empty()) {
            form = form.text("language", language.to_string());
        }

        let form = form.part("file", file_part);

        tracing::debug!(
            model = %self.model,
            filename = %filename,
            bytes = audio_data.len(),
            "Sending audio to OpenAI Whisper API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = provider_error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
            return Err(TranscriptionError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let result: WhisperTranscriptionResponse =
            response.json().await.map_err(|e| self.classify(e))?;

        tracing::info!(
            chars = result.text.len(),
            "OpenAI Whisper transcription completed"
        );

        Ok(result.text.trim().to_string())
    }
}

/// Pulls `error.message` (or a bare string `error`) out of a provider error body.
fn provider_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;

    error
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| error.as_str())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
