mod extractor;
mod session_store;

pub use extractor::{SESSION_COOKIE, session_token};
pub use session_store::SessionStore;
