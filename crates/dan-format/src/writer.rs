//! Encoding of `.dan` files.
//!
//! The writer validates every counter against its field width before any
//! byte is emitted for the offending structure, so a world that cannot be
//! represented fails with `DanError::Encode` instead of producing a file the
//! reader would misinterpret.

use byteorder::{BigEndian, WriteBytesExt};
use dan_core::error::DanError;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::io::{write_err, write_string};
use crate::world::{Chunk, ChunkSection, DanWorld, MAGIC, MAX_PROPERTIES};
use crate::FormatResult;

impl DanWorld {
    /// Write the world to a file, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P, compression: Compression) -> FormatResult<u64> {
        let path = path.as_ref();
        let bytes = self.encode(compression)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                DanError::io(format!("Failed to create {}", parent.display()), e)
            })?;
        }
        fs::write(path, &bytes)
            .map_err(|e| DanError::io(format!("Failed to write {}", path.display()), e))?;

        debug!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(bytes.len() as u64)
    }

    /// Write the gzip-compressed world to any writer
    pub fn write_to<W: Write>(&self, writer: W, compression: Compression) -> FormatResult<()> {
        let mut gz = GzEncoder::new(writer, compression);
        write_world(&mut gz, self)?;
        gz.finish().map_err(write_err("gzip trailer"))?;
        Ok(())
    }

    /// Encode the world to compressed bytes
    pub fn encode(&self, compression: Compression) -> FormatResult<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer, compression)?;
        Ok(buffer)
    }
}

fn write_world<W: Write>(w: &mut W, world: &DanWorld) -> FormatResult<()> {
    let expected = world.width as usize * world.depth as usize;
    if world.chunks.len() != expected {
        return Err(DanError::encode(
            "chunk grid",
            format!(
                "{} chunks present but a {}x{} grid needs {}",
                world.chunks.len(),
                world.width,
                world.depth,
                expected
            ),
        ));
    }

    write_string(w, MAGIC, "magic")?;
    w.write_u8(world.version).map_err(write_err("version"))?;
    w.write_u8(world.dimension.id()).map_err(write_err("dimension"))?;
    w.write_u16::<BigEndian>(world.width).map_err(write_err("width"))?;
    w.write_u16::<BigEndian>(world.depth).map_err(write_err("depth"))?;

    for chunk in &world.chunks {
        write_chunk(w, chunk)?;
    }

    let extra_count = u16::try_from(world.extra_count())
        .map_err(|_| DanError::encode("extras", "more than 65535 extras"))?;
    w.write_u16::<BigEndian>(extra_count).map_err(write_err("extra count"))?;
    for (key, extra) in world.extras() {
        let len = u16::try_from(extra.data.len()).map_err(|_| {
            DanError::encode(
                format!("extra '{}'", key),
                format!("{} bytes exceeds the 65535 byte limit", extra.data.len()),
            )
        })?;
        write_string(w, key, "extra key")?;
        w.write_u16::<BigEndian>(len).map_err(write_err("extra length"))?;
        w.write_all(&extra.data).map_err(write_err("extra data"))?;
    }

    Ok(())
}

fn write_chunk<W: Write>(w: &mut W, chunk: &Chunk) -> FormatResult<()> {
    let section_count = u8::try_from(chunk.sections.len()).map_err(|_| {
        DanError::encode(
            format!("chunk ({}, {})", chunk.x, chunk.z),
            format!("{} sections exceeds the limit of 255", chunk.sections.len()),
        )
    })?;

    w.write_u16::<BigEndian>(chunk.x).map_err(write_err("chunk x"))?;
    w.write_u16::<BigEndian>(chunk.z).map_err(write_err("chunk z"))?;
    w.write_u8(section_count).map_err(write_err("section count"))?;

    for (sy, section) in chunk.sections.iter().enumerate() {
        validate_section(chunk, sy as u8, section)?;
        write_section(w, section)?;
    }

    Ok(())
}

fn validate_section(chunk: &Chunk, sy: u8, section: &ChunkSection) -> FormatResult<()> {
    let context = || format!("chunk ({}, {}) section {}", chunk.x, chunk.z, sy);

    if section.palette.len() > u8::MAX as usize {
        return Err(DanError::PaletteOverflow {
            chunk_x: chunk.x,
            chunk_z: chunk.z,
            section: sy,
            size: section.palette.len(),
        });
    }
    if section.blocks.len() != section.biomes.len() {
        return Err(DanError::encode(
            context(),
            format!(
                "{} blocks but {} biomes",
                section.blocks.len(),
                section.biomes.len()
            ),
        ));
    }
    if section.blocks.len() > u16::MAX as usize {
        return Err(DanError::encode(
            context(),
            format!("{} blocks exceeds the limit of 65535", section.blocks.len()),
        ));
    }
    if let Some(&idx) = section
        .blocks
        .iter()
        .find(|&&idx| idx as usize >= section.palette.len())
    {
        return Err(DanError::encode(
            context(),
            format!(
                "palette index {} out of range for {} entries",
                idx,
                section.palette.len()
            ),
        ));
    }
    for (&(x, y, z), props) in &section.data {
        if x > 15 || y > 15 || z > 15 {
            return Err(DanError::encode(
                context(),
                format!("block data position ({}, {}, {}) is outside the section", x, y, z),
            ));
        }
        if props.len() > MAX_PROPERTIES {
            return Err(DanError::encode(
                context(),
                format!(
                    "block ({}, {}, {}) has {} properties, at most {} fit",
                    x,
                    y,
                    z,
                    props.len(),
                    MAX_PROPERTIES
                ),
            ));
        }
    }

    Ok(())
}

fn write_section<W: Write>(w: &mut W, section: &ChunkSection) -> FormatResult<()> {
    w.write_u8(section.palette.len() as u8)
        .map_err(write_err("palette length"))?;
    for material in &section.palette {
        write_string(w, material, "palette entry")?;
    }

    w.write_u16::<BigEndian>(section.blocks.len() as u16)
        .map_err(write_err("block count"))?;
    w.write_all(&section.blocks).map_err(write_err("blocks"))?;

    let biomes: Vec<u8> = section.biomes.iter().map(|b| b.id()).collect();
    w.write_all(&biomes).map_err(write_err("biomes"))?;

    let entries: Vec<_> = section
        .data
        .iter()
        .filter(|(_, props)| !props.is_empty())
        .collect();
    let data_count = u16::try_from(entries.len())
        .map_err(|_| DanError::encode("block data", "more than 65535 entries"))?;
    w.write_u16::<BigEndian>(data_count)
        .map_err(write_err("data count"))?;

    for (&(x, y, z), props) in entries {
        let header =
            (x as u16) << 12 | (y as u16) << 8 | (z as u16) << 4 | props.len() as u16;
        w.write_u16::<BigEndian>(header)
            .map_err(write_err("data header"))?;
        for prop in props {
            w.write_u16::<BigEndian>(prop.encode())
                .map_err(write_err("block property"))?;
        }
    }

    Ok(())
}
