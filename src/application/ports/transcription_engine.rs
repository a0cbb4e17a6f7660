use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        filename: &str,
        language: Option<&str>,
    ) -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("transcription api key is not configured")]
    MissingApiKey,
    #[error("{message}")]
    Provider { status: u16, message: String },
    #[error("transcription request timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
}
