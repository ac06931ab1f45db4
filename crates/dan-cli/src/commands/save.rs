//! `danworld save` command implementation.

use camino::Utf8PathBuf;
use dan_core::error::DanResult;
use dan_export::SparseSource;

use super::{CommandContext, CONSOLE_USER};

/// Execute the `danworld save` command
pub async fn execute(name: String, source: Utf8PathBuf, ctx: &CommandContext) -> DanResult<()> {
    let source = SparseSource::load(ctx.resolve(&source))?;

    let workspace = ctx.workspace()?;
    workspace.load(CONSOLE_USER, &name)?;

    let (exporter, bar) = ctx.exporter(&format!("Saving {}", name));
    let report = workspace.save_with(CONSOLE_USER, &source, &exporter)?;
    if let Ok(bar) = bar.lock() {
        bar.finish();
    }

    ctx.report_export(&workspace.world_path(&name)?, &report);
    Ok(())
}
