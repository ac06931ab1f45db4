//! Settings layering, file discovery, and environment overrides

use camino::{Utf8Path, Utf8PathBuf};
use dan_core::error::DanError;
use std::collections::HashMap;
use tracing::debug;

use crate::settings::{self, Settings, SettingsLayer, SETTINGS_FILE};
use crate::ConfigResult;

/// Prefix of environment variables read as overrides
pub const ENV_PREFIX: &str = "DANWORLD_";

/// Main settings loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
    /// Home directory, looked up lazily when unset
    home: Option<Utf8PathBuf>,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Where a settings layer came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Built-in defaults
    Defaults,
    /// Global config file
    Global(Utf8PathBuf),
    /// Project danworld.toml file
    Project(Utf8PathBuf),
    /// File passed with --config
    Explicit(Utf8PathBuf),
    /// Environment variable
    Environment(String),
    /// CLI flag
    CommandLine,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self { cwd, home: None }
    }

    /// Use a fixed home directory for the global config
    pub fn with_home(mut self, home: Utf8PathBuf) -> Self {
        self.home = Some(home);
        self
    }

    /// Find a file in the working directory or any of its parents
    pub fn resolve_config_path(&self, filename: &str) -> Option<Utf8PathBuf> {
        self.cwd
            .ancestors()
            .map(|dir| dir.join(filename))
            .find(|path| path.exists())
    }

    /// Path of the global config, `~/.danworld/config.toml`
    pub fn global_config_path(&self) -> ConfigResult<Utf8PathBuf> {
        let home = match &self.home {
            Some(home) => home.clone(),
            None => {
                let home_dir = dirs::home_dir().ok_or_else(|| DanError::ConfigValidation {
                    field: "home_dir".to_string(),
                    reason: "Could not determine home directory".to_string(),
                })?;
                Utf8PathBuf::try_from(home_dir).map_err(|e| DanError::ConfigValidation {
                    field: "home_dir".to_string(),
                    reason: format!("Invalid home directory path: {}", e),
                })?
            },
        };

        Ok(home.join(".danworld").join("config.toml"))
    }

    /// Load the global settings layer, if present
    pub async fn load_global_settings(&self) -> ConfigResult<Option<(SettingsLayer, ConfigSource)>> {
        let path = self.global_config_path()?;
        if !path.exists() {
            return Ok(None);
        }
        let layer = settings::load_from_file(&path).await?;
        Ok(Some((layer, ConfigSource::Global(path))))
    }

    /// Load the project settings layer: the explicit file, or the nearest danworld.toml
    pub async fn load_project_settings(
        &self,
        explicit: Option<&Utf8Path>,
    ) -> ConfigResult<Option<(SettingsLayer, ConfigSource)>> {
        if let Some(path) = explicit {
            let path = if path.is_relative() {
                self.cwd.join(path)
            } else {
                path.to_path_buf()
            };
            let layer = settings::load_from_file(&path).await?;
            return Ok(Some((layer, ConfigSource::Explicit(path))));
        }

        match self.resolve_config_path(SETTINGS_FILE) {
            Some(path) => {
                let layer = settings::load_from_file(&path).await?;
                Ok(Some((layer, ConfigSource::Project(path))))
            },
            None => Ok(None),
        }
    }

    /// Resolve settings from every layer
    ///
    /// Later layers win: defaults, global file, project file, environment,
    /// command line. A relative data directory from the defaults, environment
    /// or command line is taken relative to the working directory.
    pub async fn load(
        &self,
        explicit: Option<&Utf8Path>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<(Settings, Vec<ConfigSource>)> {
        let global = self.load_global_settings().await?;
        let project = self.load_project_settings(explicit).await?;
        let env_overrides = ConfigLayering::collect_env_overrides();

        let mut sources = vec![ConfigSource::Defaults];
        sources.extend(global.as_ref().map(|(_, source)| source.clone()));
        sources.extend(project.as_ref().map(|(_, source)| source.clone()));
        sources.extend(env_overrides.keys().map(|k| ConfigSource::Environment(k.clone())));
        if !cli_overrides.is_empty() {
            sources.push(ConfigSource::CommandLine);
        }

        let mut merged = ConfigLayering::merge_layers(
            global.map(|(layer, _)| layer),
            project.map(|(layer, _)| layer),
            env_overrides,
            cli_overrides,
        )?;

        if merged.data_dir.is_relative() {
            merged.data_dir = self.cwd.join(&merged.data_dir);
        }

        debug!("Resolved settings from {:?}", sources);
        Ok((merged, sources))
    }
}

impl ConfigLayering {
    /// Merge configuration layers over the defaults and validate the result
    pub fn merge_layers(
        global: Option<SettingsLayer>,
        project: Option<SettingsLayer>,
        env_overrides: HashMap<String, String>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<Settings> {
        let mut merged = Settings::default();

        for layer in global.iter().chain(project.iter()) {
            merged.apply(layer);
        }

        Self::apply_env_overrides(&mut merged, &env_overrides)?;

        // CLI flags have the highest priority
        Self::apply_cli_overrides(&mut merged, &cli_overrides)?;

        merged.validate()?;
        Ok(merged)
    }

    fn apply_env_overrides(
        settings: &mut Settings,
        overrides: &HashMap<String, String>,
    ) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "DANWORLD_DATA_DIR" => {
                    settings.data_dir = Utf8PathBuf::from(value);
                },
                "DANWORLD_COMPRESSION" => {
                    settings.compression = parse_compression(key, value)?;
                },
                "DANWORLD_LOG" => {
                    settings.log_level = value.clone();
                },
                _ => {
                    // Unknown environment variable, ignore
                },
            }
        }

        Ok(())
    }

    fn apply_cli_overrides(
        settings: &mut Settings,
        overrides: &HashMap<String, String>,
    ) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "data_dir" => {
                    settings.data_dir = Utf8PathBuf::from(value);
                },
                "compression" => {
                    settings.compression = parse_compression(key, value)?;
                },
                "log_level" => {
                    settings.log_level = value.clone();
                },
                "parallel" => {
                    settings.export.parallel =
                        value.parse().map_err(|_| DanError::ConfigValidation {
                            field: key.clone(),
                            reason: format!("expected true or false, got '{}'", value),
                        })?;
                },
                _ => {
                    // Unknown CLI override, ignore
                },
            }
        }

        Ok(())
    }

    /// Collect `DANWORLD_*` environment variables
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect()
    }
}

fn parse_compression(field: &str, value: &str) -> ConfigResult<u32> {
    value.trim().parse().map_err(|_| DanError::ConfigValidation {
        field: field.to_string(),
        reason: format!("gzip level must be an integer, got '{}'", value),
    })
}
