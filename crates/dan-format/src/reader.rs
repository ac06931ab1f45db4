//! Decoding of `.dan` files.

use byteorder::{BigEndian, ReadBytesExt};
use dan_core::error::DanError;
use dan_core::types::{Biome, BlockProperty, Dimension};
use flate2::read::GzDecoder;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

use crate::extra::Extra;
use crate::io::{read_bytes, read_err, read_string};
use crate::world::{Chunk, ChunkSection, DanWorld, FORMAT_VERSION, MAGIC};
use crate::FormatResult;

/// Upper bound on up-front allocations driven by header counts
const PREALLOC_LIMIT: usize = 4096;

impl DanWorld {
    /// Load a world from a `.dan` file
    pub fn load<P: AsRef<Path>>(path: P) -> FormatResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| DanError::io(format!("Failed to open {}", path.display()), e))?;
        let world = Self::read_from(BufReader::new(file))?;
        debug!(
            "Loaded {} ({}x{} chunks, {} extras)",
            path.display(),
            world.width,
            world.depth,
            world.extra_count()
        );
        Ok(world)
    }

    /// Read a gzip-compressed world from any reader
    pub fn read_from<R: Read>(reader: R) -> FormatResult<Self> {
        let mut gz = GzDecoder::new(reader);
        read_world(&mut gz)
    }

    /// Decode a world from compressed bytes
    pub fn decode(bytes: &[u8]) -> FormatResult<Self> {
        Self::read_from(bytes)
    }
}

fn read_world<R: Read>(r: &mut R) -> FormatResult<DanWorld> {
    let magic = match read_string(r, "magic") {
        Ok(magic) => magic,
        Err(DanError::Decode { message, .. }) => {
            return Err(DanError::BadMagic { found: message });
        },
        Err(DanError::Io { source, .. }) if source.kind() == std::io::ErrorKind::InvalidInput => {
            return Err(DanError::BadMagic {
                found: "data that is not gzip-compressed".to_string(),
            });
        },
        Err(e) => return Err(e),
    };
    if magic != MAGIC {
        return Err(DanError::BadMagic { found: magic });
    }

    let version = r.read_u8().map_err(read_err("version"))?;
    if version == 0 || version > FORMAT_VERSION {
        return Err(DanError::UnsupportedVersion { version });
    }

    let dimension_id = r.read_u8().map_err(read_err("dimension"))?;
    let dimension = Dimension::from_id(dimension_id).unwrap_or_else(|| {
        warn!("Unknown dimension id {}, assuming overworld", dimension_id);
        Dimension::Overworld
    });

    let width = r.read_u16::<BigEndian>().map_err(read_err("width"))?;
    let depth = r.read_u16::<BigEndian>().map_err(read_err("depth"))?;

    let chunk_count = width as usize * depth as usize;
    let mut chunks = Vec::with_capacity(chunk_count.min(PREALLOC_LIMIT));
    for _ in 0..chunk_count {
        chunks.push(read_chunk(r)?);
    }

    let extra_count = r.read_u16::<BigEndian>().map_err(read_err("extra count"))?;
    let mut extras = IndexMap::with_capacity(extra_count as usize);
    for _ in 0..extra_count {
        let key = read_string(r, "extra key")?;
        let len = r.read_u16::<BigEndian>().map_err(read_err("extra length"))? as usize;
        let data = read_bytes(r, len, "extra data")?;
        extras.insert(key, Extra::new(data));
    }

    Ok(DanWorld::new(dimension, width, depth, chunks).with_extras(extras))
}

fn read_chunk<R: Read>(r: &mut R) -> FormatResult<Chunk> {
    let x = r.read_u16::<BigEndian>().map_err(read_err("chunk x"))?;
    let z = r.read_u16::<BigEndian>().map_err(read_err("chunk z"))?;
    let section_count = r.read_u8().map_err(read_err("section count"))?;

    let mut sections = Vec::with_capacity(section_count as usize);
    for _ in 0..section_count {
        sections.push(read_section(r)?);
    }

    Ok(Chunk { x, z, sections })
}

fn read_section<R: Read>(r: &mut R) -> FormatResult<ChunkSection> {
    let palette_len = r.read_u8().map_err(read_err("palette length"))?;
    let mut palette = Vec::with_capacity(palette_len as usize);
    for _ in 0..palette_len {
        palette.push(read_string(r, "palette entry")?);
    }

    let block_count = r.read_u16::<BigEndian>().map_err(read_err("block count"))? as usize;
    let blocks = read_bytes(r, block_count, "blocks")?;
    if let Some(&idx) = blocks.iter().find(|&&idx| idx as usize >= palette.len()) {
        return Err(DanError::decode(
            "blocks",
            format!(
                "palette index {} out of range for {} entries",
                idx,
                palette.len()
            ),
        ));
    }

    let biomes = read_bytes(r, block_count, "biomes")?
        .into_iter()
        .map(Biome::from_id_lossy)
        .collect();

    let data_count = r.read_u16::<BigEndian>().map_err(read_err("data count"))?;
    let mut data = BTreeMap::new();
    for _ in 0..data_count {
        let header = r.read_u16::<BigEndian>().map_err(read_err("data header"))?;
        let x = (header >> 12) as u8;
        let y = ((header >> 8) & 0xF) as u8;
        let z = ((header >> 4) & 0xF) as u8;
        let len = (header & 0xF) as usize;

        let mut properties = Vec::with_capacity(len);
        for _ in 0..len {
            let word = r.read_u16::<BigEndian>().map_err(read_err("block property"))?;
            match BlockProperty::decode(word) {
                Some(prop) => properties.push(prop),
                None => debug!("Skipping unknown block property {:#06x}", word),
            }
        }

        if !properties.is_empty() {
            data.insert((x, y, z), properties);
        }
    }

    Ok(ChunkSection {
        palette,
        blocks,
        biomes,
        data,
    })
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::world::BLOCKS_PER_SECTION;
    use dan_core::types::{Axis, Direction, Half, StairShape};
    use flate2::Compression;
    use proptest::prelude::*;
    use proptest::test_runner::Config as ProptestConfig;

    fn property_strategy() -> impl Strategy<Value = BlockProperty> {
        prop_oneof![
            any::<u8>().prop_map(BlockProperty::Age),
            any::<bool>().prop_map(BlockProperty::Waterlogged),
            Just(BlockProperty::Orientation(Axis::Z)),
            Just(BlockProperty::Half(Half::Top)),
            Just(BlockProperty::Facing(Direction::SouthSouthWest)),
            Just(BlockProperty::StairShape(StairShape::InnerRight)),
        ]
    }

    fn section_strategy() -> impl Strategy<Value = ChunkSection> {
        (
            prop::collection::vec("[a-z_]{1,20}", 1..8),
            prop::collection::vec(any::<u8>(), BLOCKS_PER_SECTION),
            prop::collection::vec(0u8..64, BLOCKS_PER_SECTION),
            prop::collection::btree_map(
                (0u8..16, 0u8..16, 0u8..16),
                prop::collection::vec(property_strategy(), 1..=15),
                0..20,
            ),
        )
            .prop_map(|(palette, blocks, biomes, data)| {
                let len = palette.len() as u8;
                ChunkSection {
                    blocks: blocks.into_iter().map(|b| b % len).collect(),
                    biomes: biomes.into_iter().map(Biome::from_id_lossy).collect(),
                    palette,
                    data,
                }
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]
        /// Whatever the writer accepts, the reader returns unchanged
        #[test]
        fn world_survives_encode_decode(
            sections in prop::collection::vec(section_strategy(), 1..3),
            text in "[ -~]{0,40}",
        ) {
            let chunk = Chunk { x: 0, z: 0, sections };
            let mut world = DanWorld::new(Dimension::End, 1, 1, vec![chunk]);
            world.set_extra("note", Extra::text(&text));

            let bytes = world.encode(Compression::fast()).unwrap();
            let decoded = DanWorld::decode(&bytes).unwrap();

            prop_assert_eq!(decoded.extra("note").unwrap().as_text(), Some(text));
            prop_assert_eq!(decoded, world);
        }
    }
}
