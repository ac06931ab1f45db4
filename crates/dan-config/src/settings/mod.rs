//! danworld.toml settings parsing and validation

use camino::{Utf8Path, Utf8PathBuf};
use dan_core::error::DanError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ConfigResult;

/// Name of the project settings file
pub const SETTINGS_FILE: &str = "danworld.toml";

/// Highest gzip level
pub const MAX_COMPRESSION: u32 = 9;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding world projects and exported files
    pub data_dir: Utf8PathBuf,

    /// Gzip level used when writing worlds
    pub compression: u32,

    /// Default log filter
    pub log_level: String,

    /// Exporter behaviour
    pub export: ExportSettings,
}

/// `[export]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Build chunks on the rayon pool
    pub parallel: bool,
}

/// One settings file; every key is optional so files can be layered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<Utf8PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportLayer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: Utf8PathBuf::from("worlds"),
            compression: 6,
            log_level: "info".to_string(),
            export: ExportSettings::default(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl Settings {
    /// Apply the keys a layer sets
    pub fn apply(&mut self, layer: &SettingsLayer) {
        if let Some(data_dir) = &layer.data_dir {
            self.data_dir = data_dir.clone();
        }
        if let Some(compression) = layer.compression {
            self.compression = compression;
        }
        if let Some(log_level) = &layer.log_level {
            self.log_level = log_level.clone();
        }
        if let Some(parallel) = layer.export.as_ref().and_then(|e| e.parallel) {
            self.export.parallel = parallel;
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.compression > MAX_COMPRESSION {
            return Err(DanError::ConfigValidation {
                field: "compression".to_string(),
                reason: format!(
                    "gzip level must be between 0 and {}, got {}",
                    MAX_COMPRESSION, self.compression
                ),
            });
        }

        if self.data_dir.as_str().trim().is_empty() {
            return Err(DanError::ConfigValidation {
                field: "data_dir".to_string(),
                reason: "data directory cannot be empty".to_string(),
            });
        }

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(DanError::ConfigValidation {
                field: "log_level".to_string(),
                reason: format!(
                    "unknown level '{}', expected one of {}",
                    self.log_level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }

        Ok(())
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| DanError::ConfigValidation {
            field: "settings".to_string(),
            reason: format!("TOML serialization error: {}", e),
        })
    }
}

/// Parse a settings file
pub fn parse_settings(content: &str) -> ConfigResult<SettingsLayer> {
    crate::parse_toml(content, SETTINGS_FILE)
}

/// Load a settings file, resolving a relative `data_dir` against its directory
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<SettingsLayer> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DanError::io(format!("Failed to read {}", path), e))?;

    let mut layer = parse_settings(&content).map_err(|e| match e {
        DanError::TomlParse {
            message,
            line,
            column,
        } => DanError::TomlParse {
            message: format!("{} ({})", message, path),
            line,
            column,
        },
        other => other,
    })?;

    if let (Some(data_dir), Some(base)) = (&layer.data_dir, path.parent()) {
        if data_dir.is_relative() {
            layer.data_dir = Some(base.join(data_dir));
        }
    }

    debug!("Loaded settings from {}", path);
    Ok(layer)
}
