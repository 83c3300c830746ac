use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Origin of the news feed (RSS search and HTML search live under it).
    pub feed_base_url: String,
    /// Base URL of the text-classification inference server.
    pub classifier_url: Option<String>,
    /// Base URL of the speech-synthesis endpoint.
    pub tts_base_url: String,
    /// Directory synthesized audio files are written to.
    pub audio_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Total classification attempts per text, including the first.
    pub classifier_max_attempts: u32,
    /// Fixed wait between classification attempts.
    pub classifier_retry_delay_ms: u64,
}

impl AppConfig {
    /// The classifier base URL, for commands that classify.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `NEWSBRIEF_CLASSIFIER_URL`
    /// was unset or blank.
    pub fn require_classifier_url(&self) -> Result<&str, ConfigError> {
        self.classifier_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("NEWSBRIEF_CLASSIFIER_URL".to_string()))
    }
}
