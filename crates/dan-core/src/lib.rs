//! # dan-core
//!
//! Core types and utilities shared across all DanWorld crates.
//!
//! This crate provides:
//! - Dimension, Biome and block property types with their wire ids
//! - Selection bounds and the chunk grid derived from them
//! - DanError enum for unified error handling
//! - Utility functions for world naming and file checksums
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (Dimension, Biome, BlockProperty, Selection)
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{DanError, DanResult};
pub use types::{Biome, BlockPos, BlockProperty, Dimension, Selection};
