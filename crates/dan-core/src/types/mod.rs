//! Core data types for DanWorld exports.
//!
//! This module provides the fundamental types used throughout the DanWorld crates:
//! - Dimension and biome identifiers
//! - Block property words stored per block
//! - Selection bounds of an exported region

pub mod biome;
pub mod block;
pub mod dimension;
pub mod selection;

// Re-export all public types
pub use biome::Biome;
pub use block::{Axis, BlockProperty, Direction, Face, FaceSet, Half, RailShape, Side, StairShape};
pub use dimension::Dimension;
pub use selection::{BlockPos, Selection, SECTION_SIZE};
