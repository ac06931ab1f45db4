//! Utility functions and helpers.
//!
//! Common functionality used across multiple DanWorld crates.

pub mod hash;
pub mod path;

// Re-export commonly used utilities
pub use hash::{blake3_hash, blake3_hash_file};
pub use path::{is_valid_world_name, project_file_name, world_file_name, world_name};
