use std::time::Duration;

use async_trait::async_trait;

/// Converts uploads into something the transcription provider accepts.
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    /// Re-encodes arbitrary audio to mp3.
    async fn normalize(
        &self,
        audio_data: &[u8],
        source_extension: Option<&str>,
    ) -> Result<Vec<u8>, TranscodeError>;

    /// Moves m4a metadata to the front of the file without re-encoding.
    async fn repair_layout(&self, audio_data: &[u8]) -> Result<Vec<u8>, TranscodeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("conversion tool not available: {0}")]
    ToolUnavailable(String),
    #[error("conversion tool exited with {status}: {stderr}")]
    ToolFailed { status: String, stderr: String },
    #[error("conversion timed out after {0:?}")]
    TimedOut(Duration),
    #[error("conversion io error: {0}")]
    Io(String),
    #[error("conversion produced no output")]
    EmptyOutput,
}

impl TranscodeError {
    pub fn is_tool_unavailable(&self) -> bool {
        matches!(self, TranscodeError::ToolUnavailable(_))
    }
}
