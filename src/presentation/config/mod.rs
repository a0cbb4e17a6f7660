mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseSettings, LoggingSettings, QuotaSettings, SeedUser, ServerSettings, Settings,
    TranscoderSettings, TranscriptionSettings, UsersSettings,
};
