//! # Runtime Configuration
//!
//! Defaults, optionally overlaid by a JSON file named in `VG_CONFIG`, then by
//! individual environment variables. Validation runs last.
//!
//! | Variable | Default | Field |
//! |----------|---------|-------|
//! | `VG_RECOVERY_DELAY_MS` | `1300` | `recovery_delay_ms` |
//! | `VG_HUB_CAPACITY` | `64` | `hub_capacity` |
//! | `VG_SEED` | `true` | `false` disables `seed` |

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use vault_telemetry::TelemetryConfig;
use vg_03_presentation::{PresentationError, ProjectorConfig};

/// Value written once at controller creation when storage is usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedEntry {
    pub key: String,
    pub value: String,
}

impl Default for SeedEntry {
    fn default() -> Self {
        Self {
            key: "sample".to_string(),
            value: "Hello world!".to_string(),
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Auto-recovery delay after a retryable authentication error.
    pub recovery_delay_ms: u64,
    /// Events buffered per hub listener.
    pub hub_capacity: usize,
    /// Sample entry seeded at creation; `None` disables seeding.
    pub seed: Option<SeedEntry>,
    /// Logging configuration.
    pub telemetry: TelemetryConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            recovery_delay_ms: 1300,
            hub_capacity: shared_bus::DEFAULT_CHANNEL_CAPACITY,
            seed: Some(SeedEntry::default()),
            telemetry: TelemetryConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("Invalid projector settings: {0}")]
    Projector(#[from] PresentationError),

    #[error("Seed entry needs a non-empty key and value")]
    EmptySeed,
}

impl RuntimeConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` in place of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("VG_CONFIG") {
            Some(path) => {
                let path = PathBuf::from(path);
                let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                info!(path = %path.display(), "[runtime] Loaded config file");
                Self::from_json(&text)?
            }
            None => Self::default(),
        };

        config.telemetry = TelemetryConfig {
            service_name: lookup("OTEL_SERVICE_NAME").unwrap_or(config.telemetry.service_name),
            log_level: lookup("VG_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(config.telemetry.log_level),
            json_logs: lookup("VG_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(config.telemetry.json_logs),
            with_target: config.telemetry.with_target,
        };

        override_parsed(&lookup, "VG_RECOVERY_DELAY_MS", &mut config.recovery_delay_ms);
        override_parsed(&lookup, "VG_HUB_CAPACITY", &mut config.hub_capacity);

        if let Some(seed) = lookup("VG_SEED") {
            if seed.to_lowercase() == "false" || seed == "0" {
                config.seed = None;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a (possibly partial) JSON document over the defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.projector().validate()?;
        if self.hub_capacity == 0 {
            return Err(ConfigError::Zero {
                field: "hub_capacity",
            });
        }
        if let Some(seed) = &self.seed {
            if seed.key.is_empty() || seed.value.is_empty() {
                return Err(ConfigError::EmptySeed);
            }
        }
        Ok(())
    }

    pub fn recovery_delay(&self) -> Duration {
        Duration::from_millis(self.recovery_delay_ms)
    }

    pub fn projector(&self) -> ProjectorConfig {
        ProjectorConfig::default().with_recovery_delay(self.recovery_delay())
    }
}

fn override_parsed<F, T>(lookup: &F, name: &str, field: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(raw) = lookup(name) {
        match raw.parse() {
            Ok(value) => *field = value,
            Err(_) => warn!(variable = name, value = %raw, "[runtime] Ignoring unparsable setting"),
        }
    }
}
