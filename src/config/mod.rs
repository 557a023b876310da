//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Match model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Strength bonus added to the home side
    #[serde(default = "default_home_advantage")]
    pub home_advantage: u32,

    /// Fixed seed for the live season and the replay seed generator.
    /// Unset means seed from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_home_advantage() -> u32 {
    10
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            home_advantage: default_home_advantage(),
            seed: None,
        }
    }
}

/// Championship forecast configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// Replays run for every league table request
    #[serde(default = "default_replays")]
    pub replays: usize,

    /// Upper bound on replays for a single prediction
    #[serde(default = "default_max_replays")]
    pub max_replays: usize,

    /// Replays allowed to run at the same time
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Deadline for a whole prediction
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_replays() -> usize {
    1000
}

fn default_max_replays() -> usize {
    100_000
}

fn default_max_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_timeout() -> u64 {
    30
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            replays: default_replays(),
            max_replays: default_max_replays(),
            max_concurrency: default_max_concurrency(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// A team created when the league starts with an empty store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSeed {
    pub name: String,
    pub strength: u32,
}

impl TeamSeed {
    pub fn new(name: impl Into<String>, strength: u32) -> Self {
        Self {
            name: name.into(),
            strength,
        }
    }
}

fn default_teams() -> Vec<TeamSeed> {
    vec![
        TeamSeed::new("Chelsea", 90),
        TeamSeed::new("Arsenal", 80),
        TeamSeed::new("Manchester City", 70),
        TeamSeed::new("Liverpool", 60),
    ]
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub prediction: PredictionConfig,

    #[serde(default = "default_teams")]
    pub teams: Vec<TeamSeed>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            simulation: SimulationConfig::default(),
            prediction: PredictionConfig::default(),
            teams: default_teams(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file {:?} not found, using defaults", path);
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.prediction.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Prediction timeout must be greater than 0".to_string(),
            ));
        }

        if self.prediction.max_concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "Prediction concurrency must be greater than 0".to_string(),
            ));
        }

        if self.prediction.replays > self.prediction.max_replays {
            return Err(ConfigError::ValidationError(format!(
                "Prediction replays ({}) exceed max_replays ({})",
                self.prediction.replays, self.prediction.max_replays
            )));
        }

        if self.teams.len() != 4 {
            return Err(ConfigError::ValidationError(format!(
                "Exactly 4 teams are required, got {}",
                self.teams.len()
            )));
        }

        if let Some(team) = self.teams.iter().find(|t| t.strength == 0) {
            return Err(ConfigError::ValidationError(format!(
                "Team '{}' must have a strength greater than 0",
                team.name
            )));
        }

        if self.teams.iter().any(|t| t.name.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "Team names must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.simulation.home_advantage, 10);
        assert_eq!(config.prediction.replays, 1000);
        assert_eq!(config.teams.len(), 4);
    }

    #[test]
    fn test_default_team_strengths() {
        let strengths: Vec<u32> = AppConfig::default().teams.iter().map(|t| t.strength).collect();
        assert_eq!(strengths, vec![90, 80, 70, 60]);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.prediction.timeout_seconds = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_replays_over_limit() {
        let mut config = AppConfig::default();
        config.prediction.replays = config.prediction.max_replays + 1;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_team_count() {
        let mut config = AppConfig::default();
        config.teams.pop();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_strength() {
        let mut config = AppConfig::default();
        config.teams[2].strength = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            data_dir = "/tmp/league"

            [prediction]
            replays = 250

            [simulation]
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/league"));
        assert_eq!(config.prediction.replays, 250);
        assert_eq!(config.prediction.max_replays, 100_000);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.home_advantage, 10);
        assert_eq!(config.teams.len(), 4);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.teams, parsed.teams);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_from_file_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 0\n").unwrap();

        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
