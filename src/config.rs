use crate::domain::Address;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    /// Factory contracts whose pool-creation events are admitted.
    pub factory_addresses: Vec<Address>,
    /// JSON-lines event feed. The indexer stays idle without one.
    pub events_file: Option<String>,
    pub poll_interval_ms: u64,
    /// Skip events whose record already exists instead of counting them again.
    pub skip_duplicate_events: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let factory_addresses = parse_factory_addresses(&env_map)?;

        let events_file = env_map
            .get("EVENTS_FILE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let poll_interval_ms = env_map
            .get("POLL_INTERVAL_MS")
            .map(|s| s.as_str())
            .unwrap_or("5000")
            .parse::<u64>()
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "POLL_INTERVAL_MS".to_string(),
                    "must be a positive integer".to_string(),
                )
            })?;

        let skip_duplicate_events = match env_map
            .get("SKIP_DUPLICATE_EVENTS")
            .map(|s| s.trim().to_ascii_lowercase())
            .as_deref()
            .unwrap_or("false")
        {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "SKIP_DUPLICATE_EVENTS".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        Ok(Config {
            port,
            database_path,
            factory_addresses,
            events_file,
            poll_interval_ms,
            skip_duplicate_events,
        })
    }
}

fn parse_factory_addresses(env_map: &HashMap<String, String>) -> Result<Vec<Address>, ConfigError> {
    let raw = env_map
        .get("FACTORY_ADDRESSES")
        .ok_or_else(|| ConfigError::MissingEnv("FACTORY_ADDRESSES".to_string()))?;

    let mut addresses = Vec::new();
    for part in raw.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let address = Address::parse(part).map_err(|e| {
            ConfigError::InvalidValue("FACTORY_ADDRESSES".to_string(), format!("{}: {}", part, e))
        })?;
        if !addresses.contains(&address) {
            addresses.push(address);
        }
    }

    if addresses.is_empty() {
        return Err(ConfigError::InvalidValue(
            "FACTORY_ADDRESSES".to_string(),
            "at least one address is required".to_string(),
        ));
    }
    Ok(addresses)
}
