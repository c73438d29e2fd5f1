use dotenvy::dotenv;
use std::{env, net::IpAddr};
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid GEMINI_API_BASE: {0}")]
    InvalidApiBase(String),
    #[error("invalid HOST: {0}")]
    InvalidHost(String),
    #[error("invalid RELAY_LOG_PAYLOADS value (expected true|false): {0}")]
    InvalidLogPayloads(String),
}

/// Settings the relay is constructed with.
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// `None` is allowed: every chat request then fails with a 500.
    pub api_key: Option<String>,
    pub api_base: String,
    /// Log full request and response payloads at info level.
    pub log_payloads: bool,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            log_payloads: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        if cfg!(not(test)) {
            let _ = dotenv();
        }

        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        let api_base = match env::var("GEMINI_API_BASE") {
            Ok(s) if !s.trim().is_empty() => {
                let parsed =
                    url::Url::parse(&s).map_err(|_| ConfigError::InvalidApiBase(s.clone()))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(ConfigError::InvalidApiBase(s));
                }
                s.trim_end_matches('/').to_string()
            }
            _ => DEFAULT_API_BASE.to_string(),
        };

        let log_payloads = match env::var("RELAY_LOG_PAYLOADS") {
            Ok(raw) => match raw.to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" | "" => false,
                other => return Err(ConfigError::InvalidLogPayloads(other.to_string())),
            },
            Err(_) => false,
        };

        let host = match env::var("HOST") {
            Ok(s) if !s.trim().is_empty() => s
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidHost(s.clone()))?,
            _ => IpAddr::from([127, 0, 0, 1]),
        };

        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(5000u16);

        Ok(AppConfig {
            host,
            port,
            gemini: GeminiConfig {
                api_key,
                api_base,
                log_payloads,
            },
        })
    }
}
