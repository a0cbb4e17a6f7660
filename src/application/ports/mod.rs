mod audio_transcoder;
mod repository_error;
mod transcription_engine;
mod user_repository;

pub use audio_transcoder::{AudioTranscoder, TranscodeError};
pub use repository_error::RepositoryError;
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
pub use user_repository::{DeductionOutcome, UserRepository};
