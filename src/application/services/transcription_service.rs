use std::sync::Arc;

use crate::application::ports::{
    AudioTranscoder, RepositoryError, TranscodeError, TranscriptionEngine, TranscriptionError,
};
use crate::domain::{AudioFormat, AuthenticatedUser, PipelineStage, UploadArtifact};

use super::quota_ledger::{LedgerError, QuotaLedger};
use super::text_formatter::format_sentences;

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptOutput {
    pub text: String,
    pub format: AudioFormat,
    pub minutes_charged: f64,
    pub minutes_remaining: f64,
}

/// Runs one upload through classification, conversion, the quota check,
/// the provider call and the final deduction.
pub struct TranscriptionService {
    transcoder: Arc<dyn AudioTranscoder>,
    engine: Arc<dyn TranscriptionEngine>,
    ledger: Arc<QuotaLedger>,
}

impl TranscriptionService {
    pub fn new(
        transcoder: Arc<dyn AudioTranscoder>,
        engine: Arc<dyn TranscriptionEngine>,
        ledger: Arc<QuotaLedger>,
    ) -> Self {
        Self {
            transcoder,
            engine,
            ledger,
        }
    }

    pub fn ledger(&self) -> &QuotaLedger {
        &self.ledger
    }

    #[tracing::instrument(
        skip_all,
        fields(
            user = %user,
            filename = %upload.declared_filename,
            size = upload.size(),
        )
    )]
    pub async fn process(
        &self,
        user: &AuthenticatedUser,
        upload: UploadArtifact,
        language: Option<&str>,
    ) -> Result<TranscriptOutput, PipelineError> {
        let result = self.run(user, upload, language).await;

        if let Err(e) = &result {
            tracing::warn!(stage = %PipelineStage::Failed, error = %e, "Transcription request failed");
        }

        result
    }

    async fn run(
        &self,
        user: &AuthenticatedUser,
        upload: UploadArtifact,
        language: Option<&str>,
    ) -> Result<TranscriptOutput, PipelineError> {
        tracing::debug!(stage = %PipelineStage::Received, "Upload received");

        if upload.is_empty() {
            return Err(PipelineError::EmptyUpload);
        }

        // Charged on the size the client sent, before any conversion.
        let minutes = self.ledger.estimate_minutes(upload.size());

        tracing::debug!(
            stage = %PipelineStage::Classified,
            format = %upload.format,
            minutes,
            "Upload classified"
        );

        let upload = self.prepare(upload).await?;

        self.ledger.ensure_covers(user.username(), minutes).await?;
        tracing::debug!(stage = %PipelineStage::QuotaChecked, "Quota covers request");

        let raw_text = self
            .engine
            .transcribe(&upload.data, &upload.working_filename, language)
            .await
            .map_err(|e| {
                match &e {
                    TranscriptionError::Provider { status, message } => tracing::error!(
                        filename = %upload.working_filename,
                        size = upload.size(),
                        status,
                        message = %message,
                        "Provider rejected transcription"
                    ),
                    other => tracing::error!(
                        filename = %upload.working_filename,
                        size = upload.size(),
                        error = %other,
                        "Transcription call failed"
                    ),
                }
                PipelineError::Transcription(e)
            })?;

        let text = format_sentences(&raw_text);
        tracing::debug!(stage = %PipelineStage::Transcribed, chars = text.len(), "Transcript received");

        let minutes_remaining = self.ledger.check_and_deduct(user.username(), minutes).await?;
        tracing::debug!(stage = %PipelineStage::Deducted, minutes, minutes_remaining, "Quota committed");

        tracing::info!(
            stage = %PipelineStage::Completed,
            format = %upload.format,
            minutes_charged = minutes,
            minutes_remaining,
            "Transcription completed"
        );

        Ok(TranscriptOutput {
            text,
            format: upload.format,
            minutes_charged: minutes,
            minutes_remaining,
        })
    }

    async fn prepare(&self, mut upload: UploadArtifact) -> Result<UploadArtifact, PipelineError> {
        if !upload.format.is_provider_acceptable() {
            let converted = self
                .transcoder
                .normalize(&upload.data, conversion_hint(&upload))
                .await
                .map_err(|e| {
                    tracing::error!(
                        filename = %upload.declared_filename,
                        size = upload.size(),
                        format = %upload.format,
                        error = %e,
                        "Audio normalization failed"
                    );
                    PipelineError::Conversion(e)
                })?;

            upload.replace_data(converted, AudioFormat::Mp3);
            tracing::debug!(
                stage = %PipelineStage::Transcoded,
                size = upload.size(),
                "Upload normalized to mp3"
            );
            return Ok(upload);
        }

        if upload.format == AudioFormat::M4a {
            match self.transcoder.repair_layout(&upload.data).await {
                Ok(repaired) => upload.replace_data(repaired, AudioFormat::M4a),
                Err(e) if e.is_tool_unavailable() => {
                    tracing::warn!(error = %e, "Skipping m4a layout repair");
                }
                Err(e) => {
                    tracing::warn!(
                        filename = %upload.declared_filename,
                        size = upload.size(),
                        error = %e,
                        "m4a layout repair failed, sending original bytes"
                    );
                }
            }
        }

        tracing::debug!(stage = %PipelineStage::PassedThrough, "Upload passed through");
        Ok(upload)
    }
}

/// Input extension for the converter: the sniffed format when known,
/// otherwise whatever the client declared.
fn conversion_hint(upload: &UploadArtifact) -> Option<&str> {
    match upload.format {
        AudioFormat::Unknown => upload.declared_extension(),
        known => Some(known.extension()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("uploaded file is empty")]
    EmptyUpload,
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error("quota exceeded: {required:.4} minutes required, {remaining:.4} remaining")]
    QuotaExceeded { required: f64, remaining: f64 },
    #[error("audio conversion failed: {0}")]
    Conversion(#[from] TranscodeError),
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
    #[error("storage: {0}")]
    Storage(#[from] RepositoryError),
}

impl From<LedgerError> for PipelineError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::UnknownUser(name) => PipelineError::UnknownUser(name),
            LedgerError::InsufficientMinutes {
                required,
                remaining,
            } => PipelineError::QuotaExceeded {
                required,
                remaining,
            },
            LedgerError::Storage(e) => PipelineError::Storage(e),
        }
    }
}
