use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    // Only classification needs it; `news` runs without.
    let classifier_url = optional("NEWSBRIEF_CLASSIFIER_URL");

    let env = parse_environment(&or_default("NEWSBRIEF_ENV", "development"))?;

    let bind_addr = parse("NEWSBRIEF_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("NEWSBRIEF_LOG_LEVEL", "info");
    let feed_base_url = or_default("NEWSBRIEF_FEED_BASE_URL", "https://news.google.com");
    let tts_base_url = or_default("NEWSBRIEF_TTS_BASE_URL", "https://translate.google.com");
    let audio_dir = PathBuf::from(or_default("NEWSBRIEF_AUDIO_DIR", "./output"));

    let request_timeout_secs = parse_u64("NEWSBRIEF_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("NEWSBRIEF_USER_AGENT", DEFAULT_USER_AGENT);

    let classifier_max_attempts = parse_u32("NEWSBRIEF_CLASSIFIER_MAX_ATTEMPTS", "3")?;
    if classifier_max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "NEWSBRIEF_CLASSIFIER_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let classifier_retry_delay_ms = parse_u64("NEWSBRIEF_CLASSIFIER_RETRY_DELAY_MS", "1000")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        feed_base_url,
        classifier_url,
        tts_base_url,
        audio_dir,
        request_timeout_secs,
        user_agent,
        classifier_max_attempts,
        classifier_retry_delay_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEWSBRIEF_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
