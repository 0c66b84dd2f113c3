//! Daemon configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::scheduler::DispatchPolicy;

/// Daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device selection and simulated fleet.
    pub device: DeviceConfig,
    /// Status polling settings.
    pub poller: PollerConfig,
    /// Schedule dispatch settings.
    pub scheduler: SchedulerConfig,
    /// Schedule storage settings.
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        // Create parent directories if needed
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - The selected nickname is non-empty and appears in the appliance list
    /// - The appliance list has no duplicates
    /// - Poll interval, tick period, and settle delay are within bounds
    /// - The schedule path is not empty
    ///
    /// # Example
    ///
    /// ```
    /// use brisk_service::Config;
    ///
    /// let config = Config::default();
    /// config.validate().expect("Default config should be valid");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        errors.extend(self.device.validate());
        errors.extend(self.poller.validate());
        errors.extend(self.scheduler.validate());
        errors.extend(self.storage.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    ///
    /// This is a convenience method that combines `load()` and `validate()`.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Device selection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Nickname of the appliance the daemon keeps polled.
    pub nickname: String,
    /// Nicknames of the appliances on the simulated account.
    pub appliances: Vec<String>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            nickname: "AC1".to_string(),
            appliances: vec!["AC1".to_string(), "AC2".to_string()],
        }
    }
}

impl DeviceConfig {
    /// Validate device configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.nickname.is_empty() {
            errors.push(ValidationError {
                field: "device.nickname".to_string(),
                message: "nickname cannot be empty".to_string(),
            });
        }

        if self.appliances.is_empty() {
            errors.push(ValidationError {
                field: "device.appliances".to_string(),
                message: "appliance list cannot be empty".to_string(),
            });
        } else {
            let mut seen = std::collections::HashSet::new();
            for (i, nickname) in self.appliances.iter().enumerate() {
                if nickname.is_empty() {
                    errors.push(ValidationError {
                        field: format!("device.appliances[{}]", i),
                        message: "nickname cannot be empty".to_string(),
                    });
                } else if !seen.insert(nickname.as_str()) {
                    errors.push(ValidationError {
                        field: format!("device.appliances[{}]", i),
                        message: format!("duplicate appliance nickname '{}'", nickname),
                    });
                }
            }

            if !self.nickname.is_empty() && !self.appliances.contains(&self.nickname) {
                errors.push(ValidationError {
                    field: "device.nickname".to_string(),
                    message: format!(
                        "nickname '{}' is not in the appliance list",
                        self.nickname
                    ),
                });
            }
        }

        errors
    }
}

/// Status polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Seconds between status polls.
    pub interval_secs: u64,
}

/// Minimum poll interval in seconds.
pub const MIN_POLL_INTERVAL: u64 = 1;
/// Maximum poll interval in seconds (1 hour).
pub const MAX_POLL_INTERVAL: u64 = 3600;

impl Default for PollerConfig {
    fn default() -> Self {
        Self { interval_secs: 5 }
    }
}

impl PollerConfig {
    /// Validate poller configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.interval_secs < MIN_POLL_INTERVAL {
            errors.push(ValidationError {
                field: "poller.interval_secs".to_string(),
                message: format!(
                    "poll interval {} is too short (minimum {} second)",
                    self.interval_secs, MIN_POLL_INTERVAL
                ),
            });
        } else if self.interval_secs > MAX_POLL_INTERVAL {
            errors.push(ValidationError {
                field: "poller.interval_secs".to_string(),
                message: format!(
                    "poll interval {} is too long (maximum {} seconds / 1 hour)",
                    self.interval_secs, MAX_POLL_INTERVAL
                ),
            });
        }

        errors
    }
}

/// Schedule dispatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between due-action checks. Scheduling granularity below
    /// this period is not promised.
    pub tick_secs: u64,
    /// Milliseconds to wait after a command before the confirmation poll.
    pub settle_ms: u64,
    /// What to do with an action whose dispatch failed.
    pub on_failure: DispatchPolicy,
}

/// Maximum tick period in seconds.
pub const MAX_TICK_SECS: u64 = 60;
/// Maximum settle delay in milliseconds (10 seconds).
pub const MAX_SETTLE_MS: u64 = 10_000;

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_secs: 1,
            settle_ms: 100,
            on_failure: DispatchPolicy::default(),
        }
    }
}

impl SchedulerConfig {
    /// Validate scheduler configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.tick_secs == 0 {
            errors.push(ValidationError {
                field: "scheduler.tick_secs".to_string(),
                message: "tick period cannot be 0".to_string(),
            });
        } else if self.tick_secs > MAX_TICK_SECS {
            errors.push(ValidationError {
                field: "scheduler.tick_secs".to_string(),
                message: format!(
                    "tick period {} is too long (maximum {} seconds)",
                    self.tick_secs, MAX_TICK_SECS
                ),
            });
        }

        if self.settle_ms > MAX_SETTLE_MS {
            errors.push(ValidationError {
                field: "scheduler.settle_ms".to_string(),
                message: format!(
                    "settle delay {} is too long (maximum {} ms)",
                    self.settle_ms, MAX_SETTLE_MS
                ),
            });
        }

        errors
    }
}

/// Schedule storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Schedule file path.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: brisk_store::default_schedule_path(),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.path.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "storage.path".to_string(),
                message: "schedule path cannot be empty".to_string(),
            });
        }

        errors
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `device.nickname` or `poller.interval_secs`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("brisk")
        .join("config.toml")
}
