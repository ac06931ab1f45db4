//! Error types and result aliases for DanWorld operations.
//!
//! Provides a unified error type that covers all possible error conditions
//! across the DanWorld crates with actionable error messages.

use thiserror::Error;

/// Unified error type for all DanWorld operations
#[derive(Error, Debug)]
pub enum DanError {
    // Config errors
    #[error("Failed to parse {message} at line {line}, column {column}")]
    TomlParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Failed to parse JSON: {message}")]
    JsonParse { message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    #[error("Invalid {kind}: '{value}'")]
    InvalidValue { kind: String, value: String },

    // Format errors
    #[error("Not a DanWorld file: expected magic 'DanWorld', found '{found}'")]
    BadMagic { found: String },

    #[error("Unsupported DanWorld format version {version}")]
    UnsupportedVersion { version: u8 },

    #[error("Failed to decode {context}: {message}")]
    Decode { context: String, message: String },

    #[error("Cannot encode {context}: {reason}")]
    Encode { context: String, reason: String },

    #[error(
        "Chunk ({chunk_x}, {chunk_z}) section {section} has {size} distinct materials, more than a palette can hold"
    )]
    PaletteOverflow {
        chunk_x: u16,
        chunk_z: u16,
        section: u8,
        size: usize,
    },

    // Selection errors
    #[error("Invalid selection: {reason}")]
    InvalidSelection { reason: String },

    #[error("Position ({x}, {y}, {z}) lies outside the selection")]
    OutOfSelection { x: f64, y: f64, z: f64 },

    // Workspace errors
    #[error("World '{name}' not found")]
    WorldNotFound { name: String },

    #[error("World '{name}' is already loaded")]
    WorldExists { name: String },

    #[error("'{user}' has no active world")]
    NoActiveWorld { user: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for DanWorld operations
pub type DanResult<T> = Result<T, DanError>;

impl DanError {
    /// Create an IO error from std::io::Error
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a decode error for a named part of the file
    pub fn decode(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create an encode error for a named part of the file
    pub fn encode(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Encode {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            DanError::BadMagic { .. } => {
                Some("Check that the file was produced by a DanWorld exporter")
            },
            DanError::UnsupportedVersion { .. } => {
                Some("Upgrade danworld to read files written by a newer exporter")
            },
            DanError::PaletteOverflow { .. } => {
                Some("Split the region into smaller selections")
            },
            DanError::InvalidSelection { .. } => {
                Some("Corners are written as x:y:z, for example 0:64:0")
            },
            DanError::OutOfSelection { .. } => {
                Some("Positions must lie inside the world's bounds; use 'danworld redefine' to grow them")
            },
            DanError::WorldNotFound { .. } => Some("Run 'danworld list' to see available worlds"),
            DanError::NoActiveWorld { .. } => {
                Some("Create a world with 'danworld new' or load one first")
            },
            _ => None,
        }
    }
}
