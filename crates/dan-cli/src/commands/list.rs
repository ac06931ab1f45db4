//! `danworld list` command implementation.

use dan_core::error::DanResult;

use super::CommandContext;

/// Execute the `danworld list` command
pub async fn execute(json: bool, ctx: &CommandContext) -> DanResult<()> {
    let workspace = ctx.workspace()?;
    let entries = workspace.list()?;

    if json {
        return ctx.output.json(&entries);
    }

    if entries.is_empty() {
        ctx.output.info(&format!("No worlds in {}", workspace.data_dir()));
        return Ok(());
    }

    ctx.output.line(&format!("Worlds in {}:", workspace.data_dir()));
    for entry in entries {
        let exported = workspace.world_path(&entry.name)?.exists();
        ctx.output.line(&entry_line(&entry.name, exported));
    }

    Ok(())
}

/// One line of the listing
pub fn entry_line(name: &str, exported: bool) -> String {
    if exported {
        format!("  {}", name)
    } else {
        format!("  {}  (not exported)", name)
    }
}
