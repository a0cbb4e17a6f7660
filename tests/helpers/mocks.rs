use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use scribegate::application::ports::{
    AudioTranscoder, DeductionOutcome, RepositoryError, TranscodeError, TranscriptionEngine,
    TranscriptionError, UserRepository,
};
use scribegate::domain::{UserAccount, UserSummary};
use scribegate::infrastructure::persistence::InMemoryUserRepository;

/// Ordered record of side effects across collaborators.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<&'static str>>>);

impl EventLog {
    pub fn push(&self, event: &'static str) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub data: Vec<u8>,
    pub filename: String,
    pub language: Option<String>,
}

enum Reply {
    Text(String),
    Provider(u16, String),
    Timeout(Duration),
}

pub struct MockTranscriptionEngine {
    reply: Reply,
    delay: Option<Duration>,
    events: Option<EventLog>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTranscriptionEngine {
    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            delay: None,
            events: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::with_reply(Reply::Text(text.to_string()))
    }

    pub fn provider_error(status: u16, message: &str) -> Self {
        Self::with_reply(Reply::Provider(status, message.to_string()))
    }

    pub fn timing_out(after: Duration) -> Self {
        Self::with_reply(Reply::Timeout(after))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TranscriptionEngine for MockTranscriptionEngine {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        filename: &str,
        language: Option<&str>,
    ) -> Result<String, TranscriptionError> {
        self.calls.lock().unwrap().push(RecordedCall {
            data: audio_data.to_vec(),
            filename: filename.to_string(),
            language: language.map(str::to_string),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(events) = &self.events {
            events.push("transcribe");
        }

        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Provider(status, message) => Err(TranscriptionError::Provider {
                status: *status,
                message: message.clone(),
            }),
            Reply::Timeout(after) => Err(TranscriptionError::Timeout(*after)),
        }
    }
}

pub enum RepairBehavior {
    Repaired(Vec<u8>),
    ToolMissing,
    ToolFails,
}

pub struct MockTranscoder {
    normalize_output: Option<Vec<u8>>,
    repair: RepairBehavior,
    normalize_calls: AtomicUsize,
    repair_calls: AtomicUsize,
    last_hint: Mutex<Option<String>>,
}

impl MockTranscoder {
    pub fn new(normalize_output: &[u8], repair: RepairBehavior) -> Self {
        Self {
            normalize_output: Some(normalize_output.to_vec()),
            repair,
            normalize_calls: AtomicUsize::new(0),
            repair_calls: AtomicUsize::new(0),
            last_hint: Mutex::new(None),
        }
    }

    pub fn passthrough() -> Self {
        Self::new(b"mp3data", RepairBehavior::ToolMissing)
    }

    pub fn failing_normalize() -> Self {
        Self {
            normalize_output: None,
            ..Self::passthrough()
        }
    }

    pub fn normalize_calls(&self) -> usize {
        self.normalize_calls.load(Ordering::SeqCst)
    }

    pub fn repair_calls(&self) -> usize {
        self.repair_calls.load(Ordering::SeqCst)
    }

    pub fn last_hint(&self) -> Option<String> {
        self.last_hint.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioTranscoder for MockTranscoder {
    async fn normalize(
        &self,
        _audio_data: &[u8],
        source_extension: Option<&str>,
    ) -> Result<Vec<u8>, TranscodeError> {
        self.normalize_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_hint.lock().unwrap() = source_extension.map(str::to_string);

        self.normalize_output
            .clone()
            .ok_or_else(|| TranscodeError::ToolFailed {
                status: "exit status: 1".to_string(),
                stderr: "Invalid data found when processing input".to_string(),
            })
    }

    async fn repair_layout(&self, _audio_data: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        self.repair_calls.fetch_add(1, Ordering::SeqCst);

        match &self.repair {
            RepairBehavior::Repaired(bytes) => Ok(bytes.clone()),
            RepairBehavior::ToolMissing => Err(TranscodeError::ToolUnavailable("ffmpeg".to_string())),
            RepairBehavior::ToolFails => Err(TranscodeError::ToolFailed {
                status: "exit status: 1".to_string(),
                stderr: "moov atom not found".to_string(),
            }),
        }
    }
}

/// In-memory repository that logs every successful deduction.
pub struct RecordingUserRepository {
    inner: InMemoryUserRepository,
    events: EventLog,
    deductions: AtomicUsize,
}

impl RecordingUserRepository {
    pub fn new(accounts: Vec<UserAccount>, events: EventLog) -> Self {
        Self {
            inner: InMemoryUserRepository::with_users(accounts),
            events,
            deductions: AtomicUsize::new(0),
        }
    }

    pub fn deductions(&self) -> usize {
        self.deductions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for RecordingUserRepository {
    async fn get_user(&self, username: &str) -> Result<Option<UserAccount>, RepositoryError> {
        self.inner.get_user(username).await
    }

    async fn deduct_minutes(
        &self,
        username: &str,
        minutes: f64,
    ) -> Result<DeductionOutcome, RepositoryError> {
        let outcome = self.inner.deduct_minutes(username, minutes).await?;
        if matches!(outcome, DeductionOutcome::Deducted { .. }) {
            self.deductions.fetch_add(1, Ordering::SeqCst);
            self.events.push("deduct");
        }
        Ok(outcome)
    }

    async fn set_limit(&self, username: &str, minutes: f64) -> Result<(), RepositoryError> {
        self.inner.set_limit(username, minutes).await
    }

    async fn set_password(&self, username: &str, password: &str) -> Result<(), RepositoryError> {
        self.inner.set_password(username, password).await
    }

    async fn add_user(&self, account: &UserAccount) -> Result<(), RepositoryError> {
        self.inner.add_user(account).await
    }

    async fn insert_if_absent(&self, account: &UserAccount) -> Result<bool, RepositoryError> {
        self.inner.insert_if_absent(account).await
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, RepositoryError> {
        self.inner.list_users().await
    }
}
