//! Terminal output formatting and utilities.
//!
//! Consistent message styles for all commands, plus JSON output, progress
//! bars and error formatting.

pub mod colors;
pub mod errors;
pub mod progress;

use dan_core::error::{DanError, DanResult};
use serde::Serialize;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: colors::ColorSupport,
}

impl OutputHandler {
    pub fn new() -> Self {
        Self {
            colors: colors::ColorSupport::detect(),
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        println!("{}", self.colors.dim(message));
    }

    /// Print a plain line
    pub fn line(&self, message: &str) {
        println!("{}", message);
    }

    /// Print a `label: value` row
    pub fn field(&self, label: &str, value: &str) {
        println!("{}  {}", self.colors.bold(&format!("{:>10}", label)), value);
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", self.colors.green("✓"), message);
    }

    pub fn warn(&self, message: &str) {
        println!("{} {}", self.colors.yellow("⚠"), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", self.colors.red("✗"), message);
    }

    /// Print a value as pretty JSON
    pub fn json<T: Serialize>(&self, value: &T) -> DanResult<()> {
        let text = serde_json::to_string_pretty(value).map_err(|e| DanError::JsonParse {
            message: format!("Failed to serialize output: {}", e),
        })?;
        println!("{}", text);
        Ok(())
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
