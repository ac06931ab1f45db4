//! Region exporter.
//!
//! The selection is cut into a grid of chunk columns starting at its minimum
//! corner. Every section is sampled block by block from the source; positions
//! past the selection's maximum (the padding of the last chunk or section on
//! each axis) are filled with [`VOID_MATERIAL`].

use camino::Utf8Path;
use dan_config::Settings;
use dan_core::error::DanError;
use dan_core::types::{Biome, Dimension, Selection, SECTION_SIZE};
use dan_format::{Chunk, ChunkSection, Compression, DanWorld, Extra, BLOCKS_PER_SECTION};
use indexmap::IndexSet;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

use crate::source::BlockSource;
use crate::ExportResult;

/// Material written for positions outside the selection
pub const VOID_MATERIAL: &str = "void_air";

type ProgressFn = dyn Fn(usize, usize) + Send + Sync;

/// Builds DanWorld files from a block source
pub struct Exporter {
    compression: Compression,
    parallel: bool,
    progress: Option<Box<ProgressFn>>,
}

/// Summary of a finished export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub width: u16,
    pub depth: u16,
    /// Sections per chunk
    pub sections: u8,
    pub chunks: usize,
    pub blocks: usize,
    /// Blocks carrying at least one property
    pub data_entries: usize,
    /// Compressed file size, zero until the world is written
    pub bytes: u64,
}

impl Exporter {
    pub fn new(settings: &Settings) -> Self {
        Self {
            compression: Compression::new(settings.compression),
            parallel: settings.export.parallel,
            progress: None,
        }
    }

    /// Report `(chunks done, chunks total)` after every chunk
    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Build the world for a selection
    pub fn export<S>(
        &self,
        selection: &Selection,
        dimension: Dimension,
        source: &S,
        extras: impl IntoIterator<Item = (String, Extra)>,
    ) -> ExportResult<(DanWorld, ExportReport)>
    where
        S: BlockSource + ?Sized,
    {
        selection.validate()?;

        // validate() bounds all three counts
        let width = selection.chunk_width() as u16;
        let depth = selection.chunk_depth() as u16;
        let sections = selection.section_count() as u8;
        let total = width as usize * depth as usize;

        info!(
            "Exporting {} ({}x{} chunks, {} sections each)",
            selection, width, depth, sections
        );

        let done = AtomicUsize::new(0);
        let build = |index: usize| -> ExportResult<Chunk> {
            let cx = (index / depth as usize) as u16;
            let cz = (index % depth as usize) as u16;
            let chunk = build_chunk(selection, source, cx, cz, sections)?;

            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(progress) = &self.progress {
                progress(finished, total);
            }
            Ok(chunk)
        };

        // x-major order either way
        let chunks: Vec<Chunk> = if self.parallel {
            (0..total).into_par_iter().map(build).collect::<ExportResult<_>>()?
        } else {
            (0..total).map(build).collect::<ExportResult<_>>()?
        };

        let mut world = DanWorld::new(dimension, width, depth, chunks);
        for (key, extra) in extras {
            world.set_extra(key, extra);
        }

        let report = ExportReport {
            width,
            depth,
            sections,
            chunks: world.chunks.len(),
            blocks: world.block_count(),
            data_entries: world
                .chunks
                .iter()
                .flat_map(|c| &c.sections)
                .map(|s| s.data.len())
                .sum(),
            bytes: 0,
        };

        Ok((world, report))
    }

    /// Build the world and write it to `path`
    pub fn export_to_file<S>(
        &self,
        path: &Utf8Path,
        selection: &Selection,
        dimension: Dimension,
        source: &S,
        extras: impl IntoIterator<Item = (String, Extra)>,
    ) -> ExportResult<ExportReport>
    where
        S: BlockSource + ?Sized,
    {
        let (world, mut report) = self.export(selection, dimension, source, extras)?;
        report.bytes = world.save(path, self.compression)?;

        info!(
            "Wrote {} ({} chunks, {} bytes)",
            path, report.chunks, report.bytes
        );
        Ok(report)
    }
}

fn build_chunk<S>(
    selection: &Selection,
    source: &S,
    cx: u16,
    cz: u16,
    sections: u8,
) -> ExportResult<Chunk>
where
    S: BlockSource + ?Sized,
{
    let sections = (0..sections)
        .map(|sy| build_section(selection, source, cx, cz, sy))
        .collect::<ExportResult<Vec<_>>>()?;

    debug!("Built chunk ({}, {})", cx, cz);
    Ok(Chunk {
        x: cx,
        z: cz,
        sections,
    })
}

fn build_section<S>(
    selection: &Selection,
    source: &S,
    cx: u16,
    cz: u16,
    sy: u8,
) -> ExportResult<ChunkSection>
where
    S: BlockSource + ?Sized,
{
    let size = SECTION_SIZE as i64;
    let base_x = selection.min.x as i64 + cx as i64 * size;
    let base_y = selection.min.y as i64 + sy as i64 * size;
    let base_z = selection.min.z as i64 + cz as i64 * size;

    let mut palette: IndexSet<String> = IndexSet::new();
    let mut blocks = Vec::with_capacity(BLOCKS_PER_SECTION);
    let mut biomes = Vec::with_capacity(BLOCKS_PER_SECTION);
    let mut data = BTreeMap::new();

    for index in 0..BLOCKS_PER_SECTION {
        let (lx, ly, lz) = ChunkSection::position(index);
        let x = base_x + lx as i64;
        let y = base_y + ly as i64;
        let z = base_z + lz as i64;

        let outside =
            x > selection.max.x as i64 || y > selection.max.y as i64 || z > selection.max.z as i64;

        let (material, biome) = if outside {
            (VOID_MATERIAL.to_string(), Biome::Plains)
        } else {
            // inside the selection, so each coordinate fits in i32
            let state = source.block_at(x as i32, y as i32, z as i32);
            if !state.properties.is_empty() {
                data.insert((lx, ly, lz), state.properties);
            }
            (state.material, state.biome)
        };

        // palette length is written as a u8
        let (palette_idx, _) = palette.insert_full(material);
        if palette.len() > u8::MAX as usize {
            return Err(DanError::PaletteOverflow {
                chunk_x: cx,
                chunk_z: cz,
                section: sy,
                size: palette.len(),
            });
        }
        blocks.push(palette_idx as u8);
        biomes.push(biome);
    }

    Ok(ChunkSection {
        palette: palette.into_iter().collect(),
        blocks,
        biomes,
        data,
    })
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::source::{BlockState, SparseSource};
    use dan_core::types::BlockPos;
    use proptest::prelude::*;

    const MATERIALS: [&str; 4] = ["stone", "dirt", "sand", "glass"];

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn exported_blocks_match_source(
            min in (-40i32..40, -20i32..20, -40i32..40),
            size in (1i32..40, 1i32..40, 1i32..40),
            placed in prop::collection::vec((0i32..40, 0i32..40, 0i32..40, 0usize..4), 0..64),
        ) {
            let a = BlockPos::new(min.0, min.1, min.2);
            let b = BlockPos::new(min.0 + size.0 - 1, min.1 + size.1 - 1, min.2 + size.2 - 1);
            let selection = Selection::new("w", a, b);

            let mut source = SparseSource::new(BlockState::default());
            for (dx, dy, dz, m) in placed {
                source.insert(
                    BlockPos::new(min.0 + dx, min.1 + dy, min.2 + dz),
                    BlockState::new(MATERIALS[m], Biome::Desert),
                );
            }

            let (world, report) = Exporter::new(&Settings::default())
                .export(&selection, Dimension::Overworld, &source, Vec::new())
                .unwrap();

            prop_assert_eq!(
                report.blocks,
                report.chunks * report.sections as usize * BLOCKS_PER_SECTION
            );

            let (w, h, d) = selection.block_extent();
            let (w, h, d) = (w as u32, h as u32, d as u32);
            for x in 0..w {
                for y in 0..h {
                    for z in 0..d {
                        let expected = source.block_at(
                            selection.min.x + x as i32,
                            selection.min.y + y as i32,
                            selection.min.z + z as i32,
                        );
                        let view = world.block_at(x, y, z).unwrap();
                        prop_assert_eq!(view.material, expected.material.as_str());
                        prop_assert_eq!(view.biome, expected.biome);
                    }
                }
            }

            // one past the edge is padding while still inside the last chunk
            if w % 16 != 0 {
                let view = world.block_at(w, 0, 0).unwrap();
                prop_assert_eq!(view.material, VOID_MATERIAL);
            }
        }
    }
}
