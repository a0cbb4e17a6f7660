use std::sync::Arc;

use crate::application::ports::{DeductionOutcome, RepositoryError, UserRepository};

/// Upload bytes treated as one minute of audio.
pub const DEFAULT_BYTES_PER_MINUTE: u64 = 1024 * 1024;

/// Owns every read and write of a user's minute balance.
pub struct QuotaLedger {
    repository: Arc<dyn UserRepository>,
    bytes_per_minute: u64,
}

impl QuotaLedger {
    pub fn new(repository: Arc<dyn UserRepository>, bytes_per_minute: u64) -> Self {
        Self {
            repository,
            bytes_per_minute: bytes_per_minute.max(1),
        }
    }

    /// Size-based duration estimate; not derived from the audio itself.
    pub fn estimate_minutes(&self, byte_len: usize) -> f64 {
        byte_len as f64 / self.bytes_per_minute as f64
    }

    pub async fn remaining(&self, username: &str) -> Result<f64, LedgerError> {
        self.repository
            .get_user(username)
            .await?
            .map(|user| user.minutes_remaining)
            .ok_or_else(|| LedgerError::UnknownUser(username.to_string()))
    }

    /// Non-mutating pre-check. A pass here does not reserve anything; the
    /// authoritative decision is made by `check_and_deduct`.
    pub async fn ensure_covers(&self, username: &str, minutes: f64) -> Result<f64, LedgerError> {
        let remaining = self.remaining(username).await?;
        if remaining < minutes {
            return Err(LedgerError::InsufficientMinutes {
                required: minutes,
                remaining,
            });
        }
        Ok(remaining)
    }

    #[tracing::instrument(skip(self))]
    pub async fn check_and_deduct(&self, username: &str, minutes: f64) -> Result<f64, LedgerError> {
        match self.repository.deduct_minutes(username, minutes).await? {
            DeductionOutcome::Deducted { remaining } => {
                tracing::info!(remaining, "Minutes deducted");
                Ok(remaining)
            }
            DeductionOutcome::Insufficient { remaining } => {
                tracing::warn!(remaining, "Deduction rejected, balance too low");
                Err(LedgerError::InsufficientMinutes {
                    required: minutes,
                    remaining,
                })
            }
            DeductionOutcome::NotFound => Err(LedgerError::UnknownUser(username.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error("quota exceeded: {required:.4} minutes required, {remaining:.4} remaining")]
    InsufficientMinutes { required: f64, remaining: f64 },
    #[error("storage: {0}")]
    Storage(#[from] RepositoryError),
}
