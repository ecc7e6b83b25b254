use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::llm_client::gemini::DEFAULT_GEMINI_URL;

/// Startup configuration failures. Fatal: the process refuses to start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("Environment variable '{key}' is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Which client answers single-model generation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProvider {
    Gemini,
    Mock,
}

impl FromStr for ModelProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ModelProvider::Gemini),
            "mock" => Ok(ModelProvider::Mock),
            other => Err(format!("unknown provider '{other}' (expected 'gemini' or 'mock')")),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub model_provider: ModelProvider,
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub model_timeout: Duration,
    /// Enriches interview prompts from the built-in reference library.
    pub reference_library: bool,
    pub port: u16,
    pub rust_log: String,
    pub queues: QueueConfig,
}

/// Sizing for the two background task queues.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub general_capacity: usize,
    pub general_workers: usize,
    pub general_drain: Duration,
    pub ai_capacity: usize,
    pub ai_workers: usize,
    pub ai_drain: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            general_capacity: 25,
            general_workers: 10,
            general_drain: Duration::from_secs(60),
            ai_capacity: 15,
            ai_workers: 8,
            ai_drain: Duration::from_secs(120),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let model_provider = parse_or("MODEL_PROVIDER", ModelProvider::Gemini)?;
        let gemini_api_key = optional_env("GEMINI_API_KEY");
        if model_provider == ModelProvider::Gemini && gemini_api_key.is_none() {
            return Err(ConfigError::Missing("GEMINI_API_KEY"));
        }

        let defaults = QueueConfig::default();
        let queues = QueueConfig {
            general_capacity: positive("GENERAL_QUEUE_CAPACITY", defaults.general_capacity)?,
            general_workers: positive("GENERAL_WORKERS", defaults.general_workers)?,
            general_drain: defaults.general_drain,
            ai_capacity: positive("AI_QUEUE_CAPACITY", defaults.ai_capacity)?,
            ai_workers: positive("AI_WORKERS", defaults.ai_workers)?,
            ai_drain: defaults.ai_drain,
        };

        let timeout_secs: u64 = parse_or("MODEL_TIMEOUT_SECS", 30)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "MODEL_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            model_provider,
            gemini_api_key,
            gemini_api_url: optional_env("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string()),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            model_timeout: Duration::from_secs(timeout_secs),
            reference_library: parse_or("ENABLE_REFERENCE_LIBRARY", false)?,
            port: parse_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            queues,
        })
    }
}

/// Treats unset and blank variables the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(key) {
        Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn positive(key: &'static str, default: usize) -> Result<usize, ConfigError> {
    let value = parse_or(key, default)?;
    if value == 0 {
        return Err(ConfigError::Invalid {
            key,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}
