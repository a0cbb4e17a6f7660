mod quota_ledger;
mod text_formatter;
mod transcription_service;

pub use quota_ledger::{DEFAULT_BYTES_PER_MINUTE, LedgerError, QuotaLedger};
pub use text_formatter::format_sentences;
pub use transcription_service::{PipelineError, TranscriptOutput, TranscriptionService};
