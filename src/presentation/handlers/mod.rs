mod balance;
mod error;
mod health;
mod session;
mod transcribe;

pub use balance::{BalanceResponse, balance_handler};
pub use error::{ApiError, ErrorResponse};
pub use health::health_handler;
pub use session::{LoginRequest, LoginResponse, login_handler, logout_handler};
pub use transcribe::{TranscribeResponse, transcribe_handler};
