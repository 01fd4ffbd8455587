//! Server Configuration
//!
//! Read from environment variables (after `.env` is loaded).

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use bank_advisor::rules::NotificationThresholds;
use bank_advisor::NarrativeConfig;
use insight_core::GenerationOptions;
use insight_runtime::OllamaConfig;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Everything the server needs at startup
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub database_path: PathBuf,

    /// Insert the demo customers into an empty database
    pub seed_demo_data: bool,

    /// Cookie signing key; a random one is generated when unset
    pub session_secret: Option<String>,

    /// How long a login stays valid
    pub session_lifetime: Duration,

    pub narrative_model: String,
    pub narrative_timeout: Duration,
    pub thresholds: NotificationThresholds,
    pub ollama: OllamaConfig,
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn parse_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<bool, ConfigError> {
    match lookup(key) {
        None => Ok(false),
        Some(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, so tests need not touch the process env
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = NotificationThresholds::default();
        let ollama_defaults = OllamaConfig::default();
        let narrative_timeout_secs: u64 = parse(&lookup, "NARRATIVE_TIMEOUT_SECS", 30)?;
        let session_ttl_secs: u64 = parse(&lookup, "SESSION_TTL_SECS", 8 * 60 * 60)?;

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            database_path: lookup("DATABASE_PATH")
                .map_or_else(|| PathBuf::from("banking_system.db"), PathBuf::from),
            seed_demo_data: parse_flag(&lookup, "SEED_DEMO_DATA")?,
            session_secret: lookup("SESSION_SECRET").filter(|s| !s.is_empty()),
            session_lifetime: Duration::from_secs(session_ttl_secs),
            narrative_model: lookup("NARRATIVE_MODEL").unwrap_or_else(|| "llama3.2".into()),
            narrative_timeout: Duration::from_secs(narrative_timeout_secs),
            thresholds: NotificationThresholds {
                savings_goal: parse::<Decimal>(&lookup, "SAVINGS_GOAL", defaults.savings_goal)?,
                spend_limit: parse::<Decimal>(&lookup, "SPEND_LIMIT", defaults.spend_limit)?,
                repayment_threshold: parse::<Decimal>(
                    &lookup,
                    "REPAYMENT_THRESHOLD",
                    defaults.repayment_threshold,
                )?,
            },
            ollama: OllamaConfig {
                host: lookup("OLLAMA_HOST").unwrap_or(ollama_defaults.host),
                port: parse(&lookup, "OLLAMA_PORT", ollama_defaults.port)?,
                // The narrative timeout is the tighter bound
                timeout_secs: narrative_timeout_secs + 5,
            },
        })
    }

    pub fn narrative_config(&self) -> NarrativeConfig {
        let defaults = NarrativeConfig::default();
        NarrativeConfig {
            generation: GenerationOptions {
                model: self.narrative_model.clone(),
                ..defaults.generation
            },
            timeout: self.narrative_timeout,
            ..defaults
        }
    }
}
