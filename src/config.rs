//! Configuration loaded from the environment (and `.env`, if present).

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;
use crate::oracle::OracleParams;

/// Main configuration for the bot.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the JSON collections
    pub data_dir: PathBuf,
    /// Oracle settings; `None` means rule-based matching only
    pub oracle: Option<OracleParams>,
    /// Sender the console driver starts as
    pub default_sender: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        let data_dir = optional_env("FARMCONNECT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));
        let default_sender = optional_env("FARMCONNECT_SENDER")
            .unwrap_or_else(|| "whatsapp:+15555550100".to_string());

        let oracle = if parse_bool("FARMCONNECT_AI_MATCHING", false)? {
            match OracleParams::from_env() {
                Ok(params) => Some(params),
                Err(ConfigError::MissingEnvVar(key)) => {
                    warn!(%key, "AI matching enabled but not configured; using rule-based matching");
                    None
                }
                Err(e) => return Err(e),
            }
        } else {
            None
        };

        Ok(Self {
            data_dir,
            oracle,
            default_sender,
        })
    }
}

impl OracleParams {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        let api_key = optional_env("GEMINI_API_KEY")
            .filter(|key| key != Self::PLACEHOLDER_KEY)
            .ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let defaults = OracleParams::default();
        let model = optional_env("GEMINI_MODEL").unwrap_or(defaults.model);
        let timeout = match optional_env("ORACLE_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse().map_err(|_| {
                ConfigError::InvalidValue {
                    key: "ORACLE_TIMEOUT_SECS".to_string(),
                    message: format!("expected whole seconds, got {raw:?}"),
                }
            })?),
            None => defaults.timeout,
        };

        Ok(Self {
            api_key,
            model,
            timeout,
            ..defaults
        })
    }
}

/// Read an env var, treating empty values as unset
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_bool(key: &str, default: bool) -> Result<bool, ConfigError> {
    match optional_env(key) {
        None => Ok(default),
        Some(value) => match value.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("expected a boolean, got {value:?}"),
            }),
        },
    }
}
