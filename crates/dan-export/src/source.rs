//! Block sources the exporter samples from.

use camino::Utf8Path;
use dan_core::error::DanError;
use dan_core::types::{Biome, BlockPos, BlockProperty};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::ExportResult;

/// State of one block as reported by a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockState {
    /// Material key without namespace
    pub material: String,
    pub biome: Biome,
    pub properties: Vec<BlockProperty>,
}

impl BlockState {
    /// A block without properties; a `minecraft:` namespace is stripped
    pub fn new(material: &str, biome: Biome) -> Self {
        Self {
            material: strip_namespace(material).to_string(),
            biome,
            properties: Vec::new(),
        }
    }

    pub fn with_properties(mut self, properties: Vec<BlockProperty>) -> Self {
        self.properties = properties;
        self
    }
}

impl Default for BlockState {
    fn default() -> Self {
        Self::new("air", Biome::Plains)
    }
}

/// Anything that can answer "what block is at this position"
///
/// Sources are sampled from several threads at once when chunks are
/// built in parallel.
pub trait BlockSource: Sync {
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockState;
}

impl<F> BlockSource for F
where
    F: Fn(i32, i32, i32) -> BlockState + Sync,
{
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockState {
        self(x, y, z)
    }
}

/// A world described by a default block plus explicitly placed blocks
#[derive(Debug, Clone, Default)]
pub struct SparseSource {
    default: BlockState,
    blocks: HashMap<BlockPos, BlockState>,
}

#[derive(Debug, Deserialize)]
struct Dump {
    #[serde(default)]
    default: Option<DumpBlock>,
    #[serde(default)]
    blocks: Vec<DumpEntry>,
}

#[derive(Debug, Deserialize)]
struct DumpBlock {
    #[serde(default = "default_material")]
    material: String,
    #[serde(default)]
    biome: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DumpEntry {
    pos: [i32; 3],
    material: String,
    #[serde(default)]
    biome: Option<String>,
    #[serde(default)]
    properties: Vec<BlockProperty>,
}

fn default_material() -> String {
    "air".to_string()
}

fn strip_namespace(key: &str) -> &str {
    key.strip_prefix("minecraft:").unwrap_or(key)
}

/// Unknown or custom biomes are exported as plains
fn lenient_biome(key: Option<&str>) -> Biome {
    match key {
        None => Biome::Plains,
        Some(key) => key.parse().unwrap_or_else(|_| {
            warn!("Unknown biome '{}', using plains", key);
            Biome::Plains
        }),
    }
}

impl SparseSource {
    /// A source where every position holds `default`
    pub fn new(default: BlockState) -> Self {
        Self {
            default,
            blocks: HashMap::new(),
        }
    }

    /// Parse a JSON block dump
    pub fn from_json(content: &str) -> ExportResult<Self> {
        let dump: Dump = serde_json::from_str(content).map_err(|e| DanError::JsonParse {
            message: format!("block dump: {}", e),
        })?;

        let default = dump
            .default
            .map(|d| BlockState::new(&d.material, lenient_biome(d.biome.as_deref())))
            .unwrap_or_default();

        let mut source = Self::new(default);
        for entry in dump.blocks {
            let [x, y, z] = entry.pos;
            let biome = entry
                .biome
                .as_deref()
                .map(|key| lenient_biome(Some(key)))
                .unwrap_or(source.default.biome);
            let state = BlockState::new(&entry.material, biome).with_properties(entry.properties);
            source.insert(BlockPos::new(x, y, z), state);
        }

        debug!("Parsed block dump with {} placed blocks", source.len());
        Ok(source)
    }

    /// Load a JSON block dump from disk
    pub fn load<P: AsRef<Utf8Path>>(path: P) -> ExportResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| DanError::io(format!("Failed to read block dump {}", path), e))?;
        Self::from_json(&content).map_err(|e| match e {
            DanError::JsonParse { message } => DanError::JsonParse {
                message: format!("{} ({})", message, path),
            },
            other => other,
        })
    }

    /// Place a block, returning the one it replaced
    pub fn insert(&mut self, pos: BlockPos, state: BlockState) -> Option<BlockState> {
        self.blocks.insert(pos, state)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl BlockSource for SparseSource {
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockState {
        self.blocks
            .get(&BlockPos::new(x, y, z))
            .unwrap_or(&self.default)
            .clone()
    }
}
