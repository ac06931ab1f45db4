//! `danworld inspect` command implementation.
//!
//! Loads a world file and prints its header, grid size, extras and a
//! checksum of the file.

use dan_core::error::DanResult;
use dan_core::types::Dimension;
use dan_core::utils::blake3_hash_file;
use dan_format::{DanWorld, ExtraValue};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::CommandContext;

/// Summary of a world file
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub file: String,
    pub checksum: String,
    pub version: u8,
    pub dimension: Dimension,
    pub width: u16,
    pub depth: u16,
    pub chunks: usize,
    pub sections: usize,
    pub blocks: usize,
    pub data_entries: usize,
    pub extras: Vec<ExtraReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<BTreeMap<String, usize>>,
}

#[derive(Debug, Serialize)]
pub struct ExtraReport {
    pub key: String,
    pub bytes: usize,
    pub value: ExtraValue,
}

/// Build the summary of a world file
pub fn summarize(file: &Path, histogram: bool) -> DanResult<InspectReport> {
    let world = DanWorld::load(file)?;
    let checksum = blake3_hash_file(file)?;

    Ok(InspectReport {
        file: file.display().to_string(),
        checksum,
        version: world.version,
        dimension: world.dimension,
        width: world.width,
        depth: world.depth,
        chunks: world.chunks.len(),
        sections: world.section_count(),
        blocks: world.block_count(),
        data_entries: world
            .chunks
            .iter()
            .flat_map(|c| &c.sections)
            .map(|s| s.data.len())
            .sum(),
        extras: world
            .extras()
            .map(|(key, extra)| ExtraReport {
                key: key.to_string(),
                bytes: extra.data.len(),
                value: extra.value(),
            })
            .collect(),
        histogram: histogram.then(|| world.material_histogram()),
    })
}

/// Execute the `danworld inspect` command
pub async fn execute(
    file: PathBuf,
    json: bool,
    histogram: bool,
    ctx: &CommandContext,
) -> DanResult<()> {
    let file = ctx.cwd.as_std_path().join(file);
    let report = summarize(&file, histogram)?;

    if json {
        return ctx.output.json(&report);
    }

    ctx.output.line(&report.file);
    ctx.output.field("version", &report.version.to_string());
    ctx.output.field("dimension", report.dimension.as_str());
    ctx.output.field(
        "chunks",
        &format!("{} ({}x{})", report.chunks, report.width, report.depth),
    );
    ctx.output.field("sections", &report.sections.to_string());
    ctx.output.field("blocks", &report.blocks.to_string());
    ctx.output.field("data", &format!("{} blocks with properties", report.data_entries));
    ctx.output.field("blake3", &report.checksum);

    if !report.extras.is_empty() {
        ctx.output.line("");
        ctx.output.line("Extras:");
        for extra in &report.extras {
            let value = match &extra.value {
                ExtraValue::Position(p) => format!(
                    "position {:.2} {:.2} {:.2} (yaw {:.1}, pitch {:.1})",
                    p.x, p.y, p.z, p.yaw, p.pitch
                ),
                ExtraValue::Text { value } => format!("text {:?}", value),
                ExtraValue::Raw { bytes } => format!("{} raw bytes", bytes.len()),
            };
            ctx.output.line(&format!("  {} -> {}", extra.key, value));
        }
    }

    if let Some(histogram) = &report.histogram {
        ctx.output.line("");
        ctx.output.line("Materials:");
        let mut rows: Vec<(&String, &usize)> = histogram.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (material, count) in rows {
            ctx.output.line(&format!("  {:>8}  {}", count, material));
        }
    }

    Ok(())
}
