//! DanWorld region format
//!
//! This crate reads and writes `.dan` files: a gzip-compressed, big-endian
//! stream holding a grid of chunk columns, each split into 16x16x16 sections
//! with a material palette, per-block biomes and packed block properties,
//! followed by named extras such as spawn points.
//!
//! ```text
//! "DanWorld" version dimension width depth chunk[width*depth] extra_count extra[..]
//! ```

pub mod extra;
mod io;
mod reader;
pub mod world;
mod writer;

// Re-export main types
pub use extra::{Extra, ExtraValue, Position};
pub use world::{
    BlockView, Chunk, ChunkSection, DanWorld, LocalPos, BLOCKS_PER_SECTION, FORMAT_VERSION, MAGIC,
    MAX_PROPERTIES,
};

pub use flate2::Compression;

use dan_core::error::DanError;

/// Result type for format operations
pub type FormatResult<T> = Result<T, DanError>;
