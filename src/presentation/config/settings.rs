use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::application::services::DEFAULT_BYTES_PER_MINUTE;
use crate::domain::UserAccount;
use crate::infrastructure::audio::{DEFAULT_BASE_URL, DEFAULT_MODEL};

use super::Environment;

const CONFIG_DIR: &str = "config";
const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub transcription: TranscriptionSettings,
    pub transcoder: TranscoderSettings,
    pub quota: QuotaSettings,
    pub users: UsersSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layers `config/base.toml`, `config/<environment>.toml` and
    /// `APP__SECTION__KEY` environment variables, later sources winning.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(&format!("{}/base", CONFIG_DIR)).required(false))
            .add_source(
                File::with_name(&format!("{}/{}", CONFIG_DIR, environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
    pub secure_cookies: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_mb: 25,
            secure_cookies: false,
        }
    }
}

impl ServerSettings {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Without a url the service keeps accounts in memory only.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl TranscriptionSettings {
    /// Configured key, falling back to `OPENAI_API_KEY`.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscoderSettings {
    pub ffmpeg_path: String,
    pub timeout_secs: u64,
}

impl Default for TranscoderSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            timeout_secs: 300,
        }
    }
}

impl TranscoderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuotaSettings {
    pub bytes_per_minute: u64,
}

impl Default for QuotaSettings {
    fn default() -> Self {
        Self {
            bytes_per_minute: DEFAULT_BYTES_PER_MINUTE,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UsersSettings {
    pub seed: Vec<SeedUser>,
}

impl UsersSettings {
    pub fn seed_accounts(&self) -> Vec<UserAccount> {
        self.seed
            .iter()
            .map(|s| UserAccount::new(&s.username, &s.password, s.minutes))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
    pub minutes: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,scribegate=debug,tower_http=debug".to_string(),
            json: false,
        }
    }
}
