use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{AudioTranscoder, TranscodeError};

const DEFAULT_INPUT_EXTENSION: &str = "bin";
const MAX_STDERR_CHARS: usize = 512;

const MP3_OUTPUT_ARGS: &[&str] = &["-vn", "-codec:a", "libmp3lame", "-q:a", "4"];
const FASTSTART_OUTPUT_ARGS: &[&str] = &["-c", "copy", "-movflags", "+faststart"];

/// Shells out to ffmpeg. Every call gets its own scratch directory, removed
/// when the call returns whatever the outcome.
pub struct FfmpegTranscoder {
    ffmpeg_path: PathBuf,
    timeout: Duration,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout,
        }
    }

    async fn run(
        &self,
        audio_data: &[u8],
        input_extension: &str,
        output_args: &[&str],
        output_name: &str,
    ) -> Result<Vec<u8>, TranscodeError> {
        let scratch = tempfile::Builder::new()
            .prefix("scribegate-")
            .tempdir()
            .map_err(|e| TranscodeError::Io(format!("failed to create scratch dir: {e}")))?;

        let input_path = scratch.path().join(format!("input.{input_extension}"));
        let output_path = scratch.path().join(output_name);

        tokio::fs::write(&input_path, audio_data)
            .await
            .map_err(|e| TranscodeError::Io(format!("failed to write input: {e}")))?;

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .args(["-nostdin", "-hide_banner", "-loglevel", "error", "-y", "-i"])
            .arg(&input_path)
            .args(output_args)
            .arg(&output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(command = ?command, "Running ffmpeg");

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Err(_) => return Err(TranscodeError::TimedOut(self.timeout)),
            Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => {
                return Err(TranscodeError::ToolUnavailable(
                    self.ffmpeg_path.display().to_string(),
                ));
            }
            Ok(Err(e)) => return Err(TranscodeError::Io(format!("failed to spawn ffmpeg: {e}"))),
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            return Err(TranscodeError::ToolFailed {
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr),
            });
        }

        let converted = tokio::fs::read(&output_path)
            .await
            .map_err(|e| TranscodeError::Io(format!("failed to read output: {e}")))?;

        if converted.is_empty() {
            return Err(TranscodeError::EmptyOutput);
        }

        Ok(converted)
    }
}

#[async_trait]
impl AudioTranscoder for FfmpegTranscoder {
    #[tracing::instrument(skip(self, audio_data), fields(bytes = audio_data.len()))]
    async fn normalize(
        &self,
        audio_data: &[u8],
        source_extension: Option<&str>,
    ) -> Result<Vec<u8>, TranscodeError> {
        let input_extension = sanitize_extension(source_extension);
        let converted = self
            .run(audio_data, &input_extension, MP3_OUTPUT_ARGS, "output.mp3")
            .await?;

        tracing::info!(
            input_bytes = audio_data.len(),
            output_bytes = converted.len(),
            "Audio normalized to mp3"
        );

        Ok(converted)
    }

    #[tracing::instrument(skip(self, audio_data), fields(bytes = audio_data.len()))]
    async fn repair_layout(&self, audio_data: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        let repaired = self
            .run(audio_data, "m4a", FASTSTART_OUTPUT_ARGS, "output.m4a")
            .await?;

        tracing::debug!(output_bytes = repaired.len(), "m4a layout repaired");

        Ok(repaired)
    }
}

/// Reports whether the binary at `ffmpeg_path` can be started.
pub fn check_ffmpeg_binary(ffmpeg_path: &Path) -> bool {
    std::process::Command::new(ffmpeg_path)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn sanitize_extension(ext: Option<&str>) -> String {
    ext.map(str::to_ascii_lowercase)
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| DEFAULT_INPUT_EXTENSION.to_string())
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    let skip = text.chars().count().saturating_sub(MAX_STDERR_CHARS);
    text.chars().skip(skip).collect()
}
