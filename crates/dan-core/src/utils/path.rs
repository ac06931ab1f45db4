//! World naming and path utilities.
//!
//! A world named `spawn` is exported to `spawn.dan` and its editable project
//! definition lives next to it in `spawn.dan.toml`.

/// Extension of exported world files
pub const WORLD_EXTENSION: &str = "dan";

/// Suffix of world project sidecars
pub const PROJECT_SUFFIX: &str = ".dan.toml";

/// Strip a trailing `.dan` from a user supplied world name
pub fn world_name(name: &str) -> &str {
    name.strip_suffix(".dan").unwrap_or(name)
}

/// File name of an exported world
pub fn world_file_name(name: &str) -> String {
    format!("{}.{}", world_name(name), WORLD_EXTENSION)
}

/// File name of a world project sidecar
pub fn project_file_name(name: &str) -> String {
    format!("{}{}", world_name(name), PROJECT_SUFFIX)
}

/// Recover the world name from a sidecar file name
pub fn name_from_project_file(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(PROJECT_SUFFIX)
        .filter(|name| !name.is_empty())
}

/// Check if a world name is usable as a file stem
pub fn is_valid_world_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        && !name.starts_with('-')
}
