//! `danworld export` command implementation.
//!
//! One-shot export of a region of a JSON block dump, without a project.

use camino::Utf8PathBuf;
use dan_core::error::DanResult;
use dan_core::types::{Dimension, Selection};
use dan_export::SparseSource;

use super::CommandContext;

pub struct ExportArgs {
    pub output: Utf8PathBuf,
    pub world: String,
    pub min: String,
    pub max: String,
    pub source: Utf8PathBuf,
    pub dimension: Dimension,
}

/// Execute the `danworld export` command
pub async fn execute(args: ExportArgs, ctx: &CommandContext) -> DanResult<()> {
    let selection = Selection::from_strings(&args.world, &args.min, &args.max)?;
    let source = SparseSource::load(ctx.resolve(&args.source))?;
    let output = ctx.resolve(&args.output);

    let (exporter, bar) = ctx.exporter("Exporting");
    let report = exporter.export_to_file(&output, &selection, args.dimension, &source, Vec::new())?;
    if let Ok(bar) = bar.lock() {
        bar.finish();
    }

    ctx.report_export(&output, &report);
    Ok(())
}
