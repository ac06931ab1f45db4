//! World project files (`<name>.dan.toml`)
//!
//! A project records everything needed to re-export a world: its name,
//! dimension, selection bounds and the extras attached to it. Extra
//! positions are kept in absolute world coordinates; they are made relative
//! to the selection only when a world is exported.

use camino::Utf8Path;
use dan_core::error::DanError;
use dan_core::types::{BlockPos, Dimension, Selection};
use dan_core::utils::is_valid_world_name;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ConfigResult;

/// Editable definition of an export
#[derive(Debug, Clone, PartialEq)]
pub struct WorldProject {
    pub name: String,
    pub dimension: Dimension,
    pub selection: Selection,
    /// Extras in definition order
    pub extras: IndexMap<String, ExtraSpec>,
}

/// Typed value of an extra before encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtraSpec {
    Position {
        x: f64,
        y: f64,
        z: f64,
        #[serde(default)]
        yaw: f32,
        #[serde(default)]
        pitch: f32,
    },
    Text {
        value: String,
    },
}

/// On-disk layout of a project file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectFile {
    name: String,
    #[serde(default)]
    dimension: Dimension,
    selection: SelectionSection,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    extras: IndexMap<String, ExtraSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SelectionSection {
    world: String,
    /// Corner written as `x:y:z`
    min: String,
    max: String,
}

impl WorldProject {
    /// Create a project with no extras
    pub fn new(name: impl Into<String>, selection: Selection, dimension: Dimension) -> ConfigResult<Self> {
        let project = Self {
            name: name.into(),
            dimension,
            selection,
            extras: IndexMap::new(),
        };
        project.validate()?;
        Ok(project)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !is_valid_world_name(&self.name) {
            return Err(DanError::ConfigValidation {
                field: "name".to_string(),
                reason: format!(
                    "'{}' is not a valid world name; use letters, digits, '-' and '_'",
                    self.name
                ),
            });
        }

        for key in self.extras.keys() {
            if key.is_empty() || key.len() > u8::MAX as usize {
                return Err(DanError::ConfigValidation {
                    field: format!("extras.{}", key),
                    reason: "extra keys must be 1 to 255 bytes long".to_string(),
                });
            }
        }

        self.selection.validate()
    }

    /// Insert or replace an extra, returning the previous value
    pub fn set_extra(&mut self, key: impl Into<String>, spec: ExtraSpec) -> Option<ExtraSpec> {
        self.extras.insert(key.into(), spec)
    }

    /// Remove an extra, keeping the order of the others
    pub fn remove_extra(&mut self, key: &str) -> Option<ExtraSpec> {
        self.extras.shift_remove(key)
    }

    /// Position extras that fall outside the selection
    pub fn stranded_extras(&self) -> Vec<String> {
        self.extras
            .iter()
            .filter(|(_, spec)| match spec {
                ExtraSpec::Position { x, y, z, .. } => !self.selection.contains(*x, *y, *z),
                ExtraSpec::Text { .. } => false,
            })
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Parse a project file
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let file: ProjectFile = crate::parse_toml(content, "world project")?;

        let min: BlockPos = file.selection.min.parse()?;
        let max: BlockPos = file.selection.max.parse()?;
        let project = Self {
            name: file.name,
            dimension: file.dimension,
            selection: Selection::new(file.selection.world, min, max),
            extras: file.extras,
        };
        project.validate()?;
        Ok(project)
    }

    /// Serialize to the project file layout
    pub fn to_toml(&self) -> ConfigResult<String> {
        let [world, min, max] = self.selection.to_strings();
        let file = ProjectFile {
            name: self.name.clone(),
            dimension: self.dimension,
            selection: SelectionSection { world, min, max },
            extras: self.extras.clone(),
        };

        toml::to_string_pretty(&file).map_err(|e| DanError::ConfigValidation {
            field: "project".to_string(),
            reason: format!("TOML serialization error: {}", e),
        })
    }

    /// Load a project file from disk
    pub fn load<P: AsRef<Utf8Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| DanError::io(format!("Failed to read {}", path), e))?;

        let project = Self::parse(&content).map_err(|e| match e {
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

        debug!("Loaded world project '{}' from {}", project.name, path);
        Ok(project)
    }

    /// Write the project file, creating parent directories
    pub fn save<P: AsRef<Utf8Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DanError::io(format!("Failed to create {}", parent), e))?;
        }
        std::fs::write(path, content)
            .map_err(|e| DanError::io(format!("Failed to write {}", path), e))?;

        debug!("Saved world project '{}' to {}", self.name, path);
        Ok(())
    }
}
