//! Per-user world project sessions.
//!
//! A [`Workspace`] owns a data directory holding project files
//! (`<name>.dan.toml`) and exported worlds (`<name>.dan`). Several users can
//! work at once; each has at most one active project, and a project may be
//! active for more than one user.

use camino::{Utf8Path, Utf8PathBuf};
use dan_config::{ExtraSpec, Settings, WorldProject};
use dan_core::error::DanError;
use dan_core::types::{Dimension, Selection};
use dan_core::utils::path::name_from_project_file;
use dan_core::utils::{is_valid_world_name, project_file_name, world_file_name, world_name};
use dan_format::Extra;
use dashmap::{DashMap, DashSet};
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::exporter::{ExportReport, Exporter};
use crate::source::BlockSource;
use crate::ExportResult;

/// Loaded projects and who is editing what
pub struct Workspace {
    data_dir: Utf8PathBuf,
    settings: Settings,
    /// Loaded projects by name
    projects: DashMap<String, WorldProject>,
    /// Active project name per user
    active: DashMap<String, String>,
    /// Projects with unsaved changes
    modified: DashSet<String>,
}

/// Snapshot of a user's active project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldStatus {
    pub name: String,
    pub dimension: Dimension,
    pub selection: Selection,
    pub modified: bool,
    pub extras: Vec<(String, ExtraSpec)>,
}

/// A project known to the workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectEntry {
    pub name: String,
    /// Held in memory by this workspace
    pub loaded: bool,
    /// Has a project file in the data directory
    pub on_disk: bool,
    pub modified: bool,
}

/// Strip a `.dan` suffix and reject names that are not plain file stems
fn checked_name(name: &str) -> ExportResult<&str> {
    let name = world_name(name);
    if !is_valid_world_name(name) {
        return Err(DanError::invalid("world name", name));
    }
    Ok(name)
}

/// Encode an extra for a selection
pub fn encode_extra(selection: &Selection, spec: &ExtraSpec) -> ExportResult<Extra> {
    match spec {
        ExtraSpec::Position {
            x,
            y,
            z,
            yaw,
            pitch,
        } => Extra::position(selection, *x, *y, *z, *yaw, *pitch),
        ExtraSpec::Text { value } => {
            if value.len() + 4 > u16::MAX as usize {
                return Err(DanError::encode(
                    "text extra",
                    format!("{} bytes does not fit in an extra", value.len()),
                ));
            }
            Ok(Extra::text(value))
        },
    }
}

impl Workspace {
    /// Open the data directory named by the settings, creating it if needed
    pub fn open(settings: Settings) -> ExportResult<Self> {
        let data_dir = settings.data_dir.clone();
        std::fs::create_dir_all(&data_dir)
            .map_err(|e| DanError::io(format!("Failed to create data directory {}", data_dir), e))?;

        debug!("Opened workspace at {}", data_dir);
        Ok(Self {
            data_dir,
            settings,
            projects: DashMap::new(),
            active: DashMap::new(),
            modified: DashSet::new(),
        })
    }

    pub fn data_dir(&self) -> &Utf8Path {
        &self.data_dir
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Project file of a world; only plain names map into the data directory
    pub fn project_path(&self, name: &str) -> ExportResult<Utf8PathBuf> {
        Ok(self.data_dir.join(project_file_name(checked_name(name)?)))
    }

    /// Exported world file
    pub fn world_path(&self, name: &str) -> ExportResult<Utf8PathBuf> {
        Ok(self.data_dir.join(world_file_name(checked_name(name)?)))
    }

    /// Name of the user's active project
    pub fn active(&self, user: &str) -> Option<String> {
        self.active.get(user).map(|name| name.value().clone())
    }

    pub fn is_modified(&self, name: &str) -> bool {
        self.modified.contains(name)
    }

    /// Start a new project and make it the user's active one
    ///
    /// Fails when a project of that name is loaded or already has a
    /// project file on disk.
    pub fn create(
        &self,
        user: &str,
        name: &str,
        selection: Selection,
        dimension: Dimension,
    ) -> ExportResult<WorldProject> {
        let name = checked_name(name)?;
        if self.projects.contains_key(name) || self.project_path(name)?.exists() {
            return Err(DanError::WorldExists {
                name: name.to_string(),
            });
        }

        let project = WorldProject::new(name, selection, dimension)?;
        self.projects.insert(name.to_string(), project.clone());
        self.modified.insert(name.to_string());
        self.active.insert(user.to_string(), name.to_string());

        info!("{} created world '{}'", user, name);
        Ok(project)
    }

    /// Read a project from its file and make it the user's active one
    ///
    /// Unsaved changes held for that project are discarded, so every user
    /// who has it active sees the file's contents afterwards.
    pub fn load(&self, user: &str, name: &str) -> ExportResult<WorldProject> {
        let name = checked_name(name)?;
        let path = self.project_path(name)?;
        if !path.exists() {
            return Err(DanError::WorldNotFound {
                name: name.to_string(),
            });
        }

        let project = WorldProject::load(&path)?;
        if project.name != name {
            return Err(DanError::ConfigValidation {
                field: "name".to_string(),
                reason: format!("{} describes world '{}', not '{}'", path, project.name, name),
            });
        }

        self.projects.insert(name.to_string(), project.clone());
        self.modified.remove(name);
        self.active.insert(user.to_string(), name.to_string());
        debug!("{} loaded world '{}'", user, name);
        Ok(project)
    }

    fn active_name(&self, user: &str) -> ExportResult<String> {
        self.active(user).ok_or_else(|| DanError::NoActiveWorld {
            user: user.to_string(),
        })
    }

    /// Apply a change to the user's active project and mark it modified
    fn update<T>(
        &self,
        user: &str,
        change: impl FnOnce(&mut WorldProject) -> ExportResult<T>,
    ) -> ExportResult<T> {
        let name = self.active_name(user)?;
        let mut project = self
            .projects
            .get_mut(&name)
            .ok_or_else(|| DanError::WorldNotFound { name: name.clone() })?;

        let result = change(&mut project)?;
        drop(project);
        self.modified.insert(name);
        Ok(result)
    }

    pub fn status(&self, user: &str) -> ExportResult<WorldStatus> {
        let (name, project) = self.active_project(user)?;

        Ok(WorldStatus {
            modified: self.modified.contains(&name),
            name,
            dimension: project.dimension,
            selection: project.selection,
            extras: project.extras.into_iter().collect(),
        })
    }

    /// Replace the bounds of the user's active project
    ///
    /// Returns the keys of position extras left outside the new bounds;
    /// saving fails until they are moved or removed.
    pub fn redefine(&self, user: &str, selection: Selection) -> ExportResult<Vec<String>> {
        selection.validate()?;
        self.update(user, |project| {
            debug!(
                "Redefined '{}' from {} to {}",
                project.name, project.selection, selection
            );
            project.selection = selection;

            let stranded = project.stranded_extras();
            for key in &stranded {
                warn!("Extra '{}' of '{}' is outside the new bounds", key, project.name);
            }
            Ok(stranded)
        })
    }

    /// Remove an extra from the user's active project
    pub fn remove_extra(&self, user: &str, key: &str) -> ExportResult<ExtraSpec> {
        self.update(user, |project| {
            project
                .remove_extra(key)
                .ok_or_else(|| DanError::invalid("extra key", key))
        })
    }

    /// Define an extra on the user's active project, returning its encoding
    pub fn set_extra(&self, user: &str, key: &str, spec: ExtraSpec) -> ExportResult<Extra> {
        if key.is_empty() || key.len() > u8::MAX as usize {
            return Err(DanError::invalid("extra key", key));
        }

        self.update(user, |project| {
            let extra = encode_extra(&project.selection, &spec)?;
            project.set_extra(key, spec);
            Ok(extra)
        })
    }

    fn active_project(&self, user: &str) -> ExportResult<(String, WorldProject)> {
        let name = self.active_name(user)?;
        let project = self
            .projects
            .get(&name)
            .map(|p| p.clone())
            .ok_or_else(|| DanError::WorldNotFound { name: name.clone() })?;
        Ok((name, project))
    }

    /// Write the user's active project file without exporting its world
    ///
    /// The project stays modified until its world is exported.
    pub fn persist(&self, user: &str) -> ExportResult<Utf8PathBuf> {
        let (name, project) = self.active_project(user)?;
        let path = self.project_path(&name)?;
        project.save(&path)?;
        Ok(path)
    }

    /// Write the user's active project file and export its world
    pub fn save<S>(&self, user: &str, source: &S) -> ExportResult<ExportReport>
    where
        S: BlockSource + ?Sized,
    {
        self.save_with(user, source, &Exporter::new(&self.settings))
    }

    /// Like [`Workspace::save`], with a caller-configured exporter
    pub fn save_with<S>(
        &self,
        user: &str,
        source: &S,
        exporter: &Exporter,
    ) -> ExportResult<ExportReport>
    where
        S: BlockSource + ?Sized,
    {
        let (name, project) = self.active_project(user)?;

        let extras = project
            .extras
            .iter()
            .map(|(key, spec)| Ok((key.clone(), encode_extra(&project.selection, spec)?)))
            .collect::<ExportResult<Vec<_>>>()?;

        project.save(self.project_path(&name)?)?;
        let report = exporter.export_to_file(
            &self.world_path(&name)?,
            &project.selection,
            project.dimension,
            source,
            extras,
        )?;

        self.modified.remove(&name);
        info!("{} saved world '{}'", user, name);
        Ok(report)
    }

    /// Projects in the data directory plus unsaved loaded ones, sorted by name
    pub fn list(&self) -> ExportResult<Vec<ProjectEntry>> {
        let mut names: Vec<String> = WalkDir::new(&self.data_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(name_from_project_file)
                    .filter(|name| is_valid_world_name(name))
                    .map(str::to_string)
            })
            .collect();

        let on_disk = names.clone();
        names.extend(self.projects.iter().map(|p| p.key().clone()));
        names.sort();
        names.dedup();

        Ok(names
            .into_iter()
            .map(|name| ProjectEntry {
                loaded: self.projects.contains_key(&name),
                on_disk: on_disk.contains(&name),
                modified: self.modified.contains(&name),
                name,
            })
            .collect())
    }
}
