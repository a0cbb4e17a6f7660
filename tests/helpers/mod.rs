#![allow(dead_code)]

mod mocks;
mod multipart;
mod test_postgres;

pub use mocks::{
    EventLog, MockTranscoder, MockTranscriptionEngine, RecordedCall, RecordingUserRepository,
    RepairBehavior,
};
pub use multipart::MultipartBody;
pub use test_postgres::TestPostgres;
