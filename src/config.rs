//! Configuration management for proc-leash.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file (JSON)
//! 3. Default values

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::runner::{CommandRunner, FailurePolicy, WorkerScope, DEFAULT_TIMEOUT};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Runner configuration.
    pub runner: RunnerSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Runner configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSection {
    /// Timeout in seconds applied to commands without their own override.
    pub default_timeout_secs: u64,
    /// What happens on spawn failure or deadline overrun.
    pub failure_policy: FailurePolicy,
    /// Per-call or shared one-slot worker.
    pub worker_scope: WorkerScope,
}

impl Default for RunnerSection {
    fn default() -> Self {
        Self {
            default_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            failure_policy: FailurePolicy::default(),
            worker_scope: WorkerScope::default(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    ///
    /// Unparseable values are ignored and the previous setting stands.
    pub fn apply_env(&mut self) {
        if let Ok(secs) = std::env::var("PROC_LEASH_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                self.runner.default_timeout_secs = secs;
            }
        }

        if let Ok(policy) = std::env::var("PROC_LEASH_FAILURE_POLICY") {
            match policy.as_str() {
                "strict" => self.runner.failure_policy = FailurePolicy::Strict,
                "tolerant" => self.runner.failure_policy = FailurePolicy::Tolerant,
                _ => {}
            }
        }

        if let Ok(scope) = std::env::var("PROC_LEASH_WORKER_SCOPE") {
            match scope.as_str() {
                "per-call" => self.runner.worker_scope = WorkerScope::PerCall,
                "shared" => self.runner.worker_scope = WorkerScope::Shared,
                _ => {}
            }
        }

        if let Ok(level) = std::env::var("PROC_LEASH_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Load configuration with the full priority chain.
    ///
    /// Priority: env vars > config file > defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env();

        Ok(config)
    }

    /// The configured default timeout as a duration.
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.runner.default_timeout_secs)
    }

    /// Build a [`CommandRunner`] from this configuration.
    pub fn to_runner(&self) -> CommandRunner {
        CommandRunner::new()
            .with_default_timeout(self.default_timeout())
            .with_policy(self.runner.failure_policy)
            .with_worker_scope(self.runner.worker_scope)
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.runner.default_timeout_secs, 15);
        assert_eq!(config.runner.failure_policy, FailurePolicy::Strict);
        assert_eq!(config.runner.worker_scope, WorkerScope::PerCall);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "runner": {
                "default_timeout_secs": 300,
                "failure_policy": "tolerant",
                "worker_scope": "shared"
            },
            "logging": {
                "level": "debug"
            }
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.runner.default_timeout_secs, 300);
        assert_eq!(config.runner.failure_policy, FailurePolicy::Tolerant);
        assert_eq!(config.runner.worker_scope, WorkerScope::Shared);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{
            "runner": {
                "default_timeout_secs": 60
            }
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.runner.default_timeout_secs, 60);
        assert_eq!(config.runner.failure_policy, FailurePolicy::Strict); // Default
        assert_eq!(config.logging.level, "info"); // Default
    }

    #[test]
    fn test_default_timeout_duration() {
        let mut config = Config::default();
        config.runner.default_timeout_secs = 300;
        assert_eq!(config.default_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_to_runner() {
        let mut config = Config::default();
        config.runner.default_timeout_secs = 300;
        config.runner.failure_policy = FailurePolicy::Tolerant;
        config.runner.worker_scope = WorkerScope::Shared;

        let runner = config.to_runner();
        assert_eq!(runner.default_timeout(), Duration::from_secs(300));
        assert_eq!(runner.policy(), FailurePolicy::Tolerant);
        assert_eq!(runner.worker_scope(), WorkerScope::Shared);
    }

    #[test]
    fn test_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();

        let result = Config::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file(Path::new("/nonexistent/proc-leash.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"default_timeout_secs\""));
        assert!(json.contains("\"failure_policy\""));
    }
}
