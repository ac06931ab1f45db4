//! In-memory model of a DanWorld file.

use dan_core::error::DanError;
use dan_core::types::{Biome, BlockProperty, Dimension, SECTION_SIZE};
use indexmap::IndexMap;
use std::collections::BTreeMap;

use crate::extra::Extra;
use crate::FormatResult;

/// Magic string opening every file
pub const MAGIC: &str = "DanWorld";

/// Newest format version this crate reads and writes
pub const FORMAT_VERSION: u8 = 1;

/// Blocks in a full 16x16x16 section
pub const BLOCKS_PER_SECTION: usize = 4096;

/// Properties a single block can carry (4-bit counter)
pub const MAX_PROPERTIES: usize = 15;

/// Block coordinates inside a section as `(x, y, z)`, each `0..16`
pub type LocalPos = (u8, u8, u8);

/// A decoded region export
#[derive(Debug, Clone, PartialEq)]
pub struct DanWorld {
    pub version: u8,
    pub dimension: Dimension,
    /// Chunk columns along X
    pub width: u16,
    /// Chunk columns along Z
    pub depth: u16,
    /// Chunk columns, x-major: index `x * depth + z`
    pub chunks: Vec<Chunk>,
    extras: IndexMap<String, Extra>,
}

/// A 16-block wide column of sections
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub x: u16,
    pub z: u16,
    /// Sections from the bottom of the selection upward
    pub sections: Vec<ChunkSection>,
}

/// A 16x16x16 cube of blocks
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChunkSection {
    /// Distinct material keys, without namespace
    pub palette: Vec<String>,
    /// Palette index per block, ordered y, then x, then z
    pub blocks: Vec<u8>,
    /// Biome per block, same order as `blocks`
    pub biomes: Vec<Biome>,
    /// Properties of blocks that have any
    pub data: BTreeMap<LocalPos, Vec<BlockProperty>>,
}

/// Everything known about a single block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockView<'a> {
    pub material: &'a str,
    pub biome: Biome,
    pub properties: &'a [BlockProperty],
}

impl DanWorld {
    /// Create a world from an already built chunk grid
    pub fn new(dimension: Dimension, width: u16, depth: u16, chunks: Vec<Chunk>) -> Self {
        Self {
            version: FORMAT_VERSION,
            dimension,
            width,
            depth,
            chunks,
            extras: IndexMap::new(),
        }
    }

    pub(crate) fn with_extras(mut self, extras: IndexMap<String, Extra>) -> Self {
        self.extras = extras;
        self
    }

    /// Chunk column at grid coordinates
    pub fn chunk(&self, cx: u16, cz: u16) -> Option<&Chunk> {
        if cx >= self.width || cz >= self.depth {
            return None;
        }
        self.chunks.get(cx as usize * self.depth as usize + cz as usize)
    }

    /// Look up a block by coordinates relative to the selection minimum
    pub fn block_at(&self, x: u32, y: u32, z: u32) -> Option<BlockView<'_>> {
        let size = SECTION_SIZE as u32;
        let cx = u16::try_from(x / size).ok()?;
        let cz = u16::try_from(z / size).ok()?;
        let section = self.chunk(cx, cz)?.sections.get((y / size) as usize)?;
        section.block((x % size) as u8, (y % size) as u8, (z % size) as u8)
    }

    pub fn extra(&self, key: &str) -> Option<&Extra> {
        self.extras.get(key)
    }

    /// Insert or replace an extra, returning the previous value
    pub fn set_extra(&mut self, key: impl Into<String>, extra: Extra) -> Option<Extra> {
        self.extras.insert(key.into(), extra)
    }

    pub fn remove_extra(&mut self, key: &str) -> Option<Extra> {
        self.extras.shift_remove(key)
    }

    /// Extras in insertion order
    pub fn extras(&self) -> impl Iterator<Item = (&str, &Extra)> {
        self.extras.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn extra_count(&self) -> usize {
        self.extras.len()
    }

    pub fn section_count(&self) -> usize {
        self.chunks.iter().map(|c| c.sections.len()).sum()
    }

    pub fn block_count(&self) -> usize {
        self.chunks
            .iter()
            .flat_map(|c| &c.sections)
            .map(|s| s.blocks.len())
            .sum()
    }

    /// Blocks per material across the whole world
    pub fn material_histogram(&self) -> BTreeMap<String, usize> {
        let mut histogram = BTreeMap::new();
        for section in self.chunks.iter().flat_map(|c| &c.sections) {
            let mut counts = vec![0usize; section.palette.len()];
            for &idx in &section.blocks {
                if let Some(count) = counts.get_mut(idx as usize) {
                    *count += 1;
                }
            }
            for (material, count) in section.palette.iter().zip(counts) {
                if count > 0 {
                    *histogram.entry(material.clone()).or_insert(0) += count;
                }
            }
        }
        histogram
    }
}

impl ChunkSection {
    /// Index of a block inside `blocks` and `biomes`
    pub fn index(x: u8, y: u8, z: u8) -> usize {
        let size = SECTION_SIZE as usize;
        y as usize * size * size + x as usize * size + z as usize
    }

    /// Inverse of [`ChunkSection::index`]
    pub fn position(index: usize) -> LocalPos {
        let size = SECTION_SIZE as usize;
        (
            ((index / size) % size) as u8,
            (index / (size * size)) as u8,
            (index % size) as u8,
        )
    }

    /// A section made of a single material
    pub fn filled(material: impl Into<String>, biome: Biome) -> Self {
        Self {
            palette: vec![material.into()],
            blocks: vec![0; BLOCKS_PER_SECTION],
            biomes: vec![biome; BLOCKS_PER_SECTION],
            data: BTreeMap::new(),
        }
    }

    fn in_bounds(x: u8, y: u8, z: u8) -> bool {
        let size = SECTION_SIZE as u8;
        x < size && y < size && z < size
    }

    /// Block at local coordinates; `None` outside `0..16`
    pub fn block(&self, x: u8, y: u8, z: u8) -> Option<BlockView<'_>> {
        if !Self::in_bounds(x, y, z) {
            return None;
        }
        let index = Self::index(x, y, z);
        let material = self.palette.get(*self.blocks.get(index)? as usize)?;
        Some(BlockView {
            material,
            biome: self.biomes.get(index).copied().unwrap_or_default(),
            properties: self
                .data
                .get(&(x, y, z))
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        })
    }

    /// Replace a block, growing the palette when needed
    ///
    /// The palette holds at most 255 materials.
    pub fn set_block(
        &mut self,
        x: u8,
        y: u8,
        z: u8,
        material: &str,
        biome: Biome,
    ) -> FormatResult<()> {
        if !Self::in_bounds(x, y, z) {
            return Err(DanError::invalid(
                "section position",
                format!("{}:{}:{}", x, y, z),
            ));
        }
        let index = Self::index(x, y, z);
        if index >= self.blocks.len() || index >= self.biomes.len() {
            return Err(DanError::encode(
                "section",
                format!(
                    "{} blocks and {} biomes, expected {}",
                    self.blocks.len(),
                    self.biomes.len(),
                    BLOCKS_PER_SECTION
                ),
            ));
        }

        let palette_idx = match self.palette.iter().position(|m| m == material) {
            Some(idx) => idx,
            None if self.palette.len() >= u8::MAX as usize => {
                return Err(DanError::encode(
                    "palette",
                    format!("'{}' would exceed {} materials", material, u8::MAX),
                ));
            },
            None => {
                self.palette.push(material.to_string());
                self.palette.len() - 1
            },
        };
        // bounded by the palette check above
        self.blocks[index] = palette_idx as u8;
        self.biomes[index] = biome;
        Ok(())
    }
}
