// Copyright 2025 Cowboy AI, LLC.

//! Layered configuration: defaults → `cordo.toml` → explicit file → environment

use crate::errors::{IntakeError, IntakeResult};
use crate::persistence::{DEFAULT_DRAFT_KEY, DEFAULT_TTL_HOURS};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

const LOCAL_CONFIG_BASENAME: &str = "cordo";
const ENV_PREFIX: &str = "CORDO";

/// Where and for how long drafts are kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceSettings {
    /// Snapshot key
    pub key: String,
    /// Hours a snapshot stays restorable
    pub ttl_hours: i64,
    /// Directory of the file snapshot store
    pub dir: PathBuf,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            key: DEFAULT_DRAFT_KEY.to_string(),
            ttl_hours: DEFAULT_TTL_HOURS,
            dir: PathBuf::from(".cordo"),
        }
    }
}

impl PersistenceSettings {
    /// Freshness window
    ///
    /// Falls back to the default window when `ttl_hours` is out of range;
    /// [`IntakeConfig::validate`] rejects such values.
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.ttl_hours)
            .unwrap_or_else(|| chrono::Duration::hours(DEFAULT_TTL_HOURS))
    }
}

/// Compression applied before upload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoSettings {
    /// JPEG quality in (0, 1]
    pub quality: f32,
    /// Bounding box width
    pub max_width: u32,
    /// Bounding box height
    pub max_height: u32,
}

impl Default for PhotoSettings {
    fn default() -> Self {
        Self {
            quality: 0.8,
            max_width: 1024,
            max_height: 1024,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Compact,
    /// One JSON object per line
    Json,
}

/// Log filter and format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl LoggingSettings {
    /// Parsed level
    pub fn level_filter(&self) -> IntakeResult<LevelFilter> {
        LevelFilter::from_str(self.level.trim()).map_err(|err| IntakeError::InvalidConfig {
            key: "logging.level",
            reason: format!("failed to parse: {err}"),
        })
    }
}

/// All intake settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Draft persistence
    pub persistence: PersistenceSettings,
    /// Photo compression
    pub photo: PhotoSettings,
    /// Log output
    pub logging: LoggingSettings,
}

impl IntakeConfig {
    /// Load settings with the usual precedence
    ///
    /// An optional `cordo.{toml,json,yaml}` in the working directory is read
    /// first, then `path` when given (it must exist), then `CORDO__*`
    /// variables such as `CORDO__PHOTO__QUALITY=0.6`.
    pub fn load(path: Option<&Path>) -> IntakeResult<Self> {
        let mut builder =
            Config::builder().add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));
        Self::build(builder)
    }

    /// Parse settings from TOML text, without other sources
    pub fn from_toml_str(toml: &str) -> IntakeResult<Self> {
        Self::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> IntakeResult<Self> {
        let config: IntakeConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the session cannot work with
    pub fn validate(&self) -> IntakeResult<()> {
        if self.persistence.key.trim().is_empty() {
            return Err(IntakeError::InvalidConfig {
                key: "persistence.key",
                reason: "must not be empty".to_string(),
            });
        }
        if self.persistence.ttl_hours <= 0 {
            return Err(IntakeError::InvalidConfig {
                key: "persistence.ttl_hours",
                reason: format!("must be positive, got {}", self.persistence.ttl_hours),
            });
        }
        if chrono::Duration::try_hours(self.persistence.ttl_hours).is_none() {
            return Err(IntakeError::InvalidConfig {
                key: "persistence.ttl_hours",
                reason: format!("out of range, got {}", self.persistence.ttl_hours),
            });
        }
        let quality = self.photo.quality;
        if !(quality > 0.0 && quality <= 1.0) {
            return Err(IntakeError::InvalidConfig {
                key: "photo.quality",
                reason: format!("must be in (0, 1], got {quality}"),
            });
        }
        if self.photo.max_width == 0 || self.photo.max_height == 0 {
            return Err(IntakeError::InvalidConfig {
                key: "photo.max_width",
                reason: "dimensions must be positive".to_string(),
            });
        }
        self.logging.level_filter()?;
        Ok(())
    }
}
