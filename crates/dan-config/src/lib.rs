//! Configuration for DanWorld tooling
//!
//! This crate handles the layered tool settings (`danworld.toml`) and the
//! per-world project files (`<name>.dan.toml`) that describe an export.

pub mod merge;
pub mod project;
pub mod settings;

// Re-export main types
pub use merge::{ConfigLayering, ConfigLoader, ConfigSource};
pub use project::{ExtraSpec, WorldProject};
pub use settings::{ExportSettings, Settings, SettingsLayer};

use dan_core::error::DanError;
use serde::de::DeserializeOwned;
use std::ops::Range;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, DanError>;

/// Parse a TOML document, reporting syntax and type errors with their location
pub(crate) fn parse_toml<T: DeserializeOwned>(content: &str, what: &str) -> ConfigResult<T> {
    // toml_edit first: its syntax errors point at the offending span
    content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| located_error(content, what, e.message(), e.span()))?;

    toml::from_str(content).map_err(|e| located_error(content, what, e.message(), e.span()))
}

fn located_error(content: &str, what: &str, message: &str, span: Option<Range<usize>>) -> DanError {
    let (line, column) = span
        .map(|span| line_column(content, span.start))
        .unwrap_or((1, 1));
    DanError::TomlParse {
        message: format!("{}: {}", what, message.trim()),
        line,
        column,
    }
}

/// 1-based line and column of a byte offset
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(content.len());
    let before = &content.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    (line, offset - line_start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column() {
        let text = "a = 1\nbb = 2\n";
        assert_eq!(line_column(text, 0), (1, 1));
        assert_eq!(line_column(text, 4), (1, 5));
        assert_eq!(line_column(text, 6), (2, 1));
        assert_eq!(line_column(text, 11), (2, 6));
        assert_eq!(line_column(text, 500), (3, 1));
    }

    #[test]
    fn test_syntax_error_location() {
        let err = parse_toml::<toml::Table>("a = 1\nb = = 2\n", "settings").unwrap_err();
        match err {
            DanError::TomlParse { message, line, .. } => {
                assert!(message.starts_with("settings:"));
                assert_eq!(line, 2);
            },
            other => panic!("expected TomlParse, got {:?}", other),
        }
    }
}
