use std::sync::Arc;

use crate::application::ports::UserRepository;
use crate::application::services::{QuotaLedger, TranscriptionService};
use crate::presentation::auth::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub transcription_service: Arc<TranscriptionService>,
    pub ledger: Arc<QuotaLedger>,
    pub user_repository: Arc<dyn UserRepository>,
    pub sessions: Arc<SessionStore>,
    pub max_upload_bytes: usize,
    pub secure_cookies: bool,
}
