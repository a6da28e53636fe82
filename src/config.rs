//! Application configuration
//!
//! Loaded once at startup from a YAML file, `.env` and environment
//! variables, then passed explicitly to whatever needs it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::models::Participant;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "BET_TRACKER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Shared password that enables editing
    #[serde(default)]
    pub password: String,
    /// Key for signing session cookies (derived from the password if empty)
    #[serde(default)]
    pub cookie_secret: String,
    /// Profit-sharing roster, in display order
    #[serde(default = "default_participants")]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("bets.csv"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Schedule feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Team to follow; no schedule is fetched when unset
    pub team_id: Option<u64>,
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Max attempts per request
    pub max_retries: u32,
    /// Base delay between attempts in milliseconds
    pub delay_ms: u64,
    pub user_agent: String,
    pub recent_limit: usize,
    pub upcoming_limit: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            team_id: None,
            base_url: "https://api.sofascore.com/api/v1".to_string(),
            timeout_secs: 10,
            max_retries: 3,
            delay_ms: 1000,
            user_agent: concat!("bet-tracker/", env!("CARGO_PKG_VERSION")).to_string(),
            recent_limit: 5,
            upcoming_limit: 5,
        }
    }
}

fn default_participants() -> Vec<Participant> {
    vec![
        Participant::new("Alex", 10),
        Participant::new("Ben", 8),
        Participant::new("Chris", 12),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            password: String::new(),
            cookie_secret: String::new(),
            participants: default_participants(),
            storage: StorageConfig::default(),
            server: ServerConfig::default(),
            schedule: ScheduleConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load from the path in `BET_TRACKER_CONFIG` (default `config.yaml`)
    pub fn load_from_env() -> Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }

    /// Load configuration from YAML file and .env
    ///
    /// A missing file falls back to defaults; environment overrides apply
    /// either way.
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let path = config_path.as_ref();
        let mut config = if path.exists() {
            let yaml_content = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&yaml_content)?
        } else {
            info!("Config file {:?} not found, using defaults", path);
            AppConfig::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Apply environment-style overrides
    pub fn apply_overrides<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(password) = get("BET_TRACKER_PASSWORD") {
            info!("Overriding password from environment variable");
            self.password = password;
        }
        if let Some(secret) = get("BET_TRACKER_COOKIE_SECRET") {
            self.cookie_secret = secret;
        }
        if let Some(data_file) = get("BET_TRACKER_DATA_FILE") {
            self.storage.data_file = PathBuf::from(data_file);
        }
        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.password.is_empty() {
            return Err(ConfigError::ValidationError(
                "password must be set (config file or BET_TRACKER_PASSWORD)".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for participant in &self.participants {
            if participant.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "participant names cannot be empty".to_string(),
                ));
            }
            if !seen.insert(participant.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate participant: {}",
                    participant.name
                )));
            }
        }

        if self.schedule.max_retries == 0 {
            return Err(ConfigError::ValidationError(
                "schedule.max_retries must be at least 1".to_string(),
            ));
        }
        if self.schedule.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "schedule.timeout_secs must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Secret used to sign session cookies
    pub fn signing_secret(&self) -> &str {
        if self.cookie_secret.is_empty() {
            &self.password
        } else {
            &self.cookie_secret
        }
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  Ledger file: {:?}", self.storage.data_file);
        info!(
            "  Participants: {}",
            self.participants
                .iter()
                .map(|p| format!("{} ({}u)", p.name, p.units))
                .collect::<Vec<_>>()
                .join(", ")
        );
        match self.schedule.team_id {
            Some(id) => info!("  Schedule team: {}", id),
            None => info!("  Schedule team: not configured"),
        }
        info!("  Log level: {}", self.log_level);
    }
}
