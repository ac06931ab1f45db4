//! `danworld new` command implementation.

use dan_core::error::DanResult;
use dan_core::types::{Dimension, Selection};

use super::{CommandContext, CONSOLE_USER};

/// Execute the `danworld new` command
pub async fn execute(
    name: String,
    world: String,
    min: String,
    max: String,
    dimension: Dimension,
    ctx: &CommandContext,
) -> DanResult<()> {
    let selection = Selection::from_strings(&world, &min, &max)?;
    let workspace = ctx.workspace()?;

    workspace.create(CONSOLE_USER, &name, selection.clone(), dimension)?;
    let path = workspace.persist(CONSOLE_USER)?;

    ctx.output.success(&format!("Created world '{}'", name));
    ctx.output.field("selection", &selection.to_string());
    ctx.output.field(
        "chunks",
        &format!(
            "{}x{}, {} sections",
            selection.chunk_width(),
            selection.chunk_depth(),
            selection.section_count()
        ),
    );
    ctx.output.field("project", path.as_str());
    ctx.output.info("");
    ctx.output.info("Next steps:");
    ctx.output.info(&format!("  danworld set {} pos spawn <x> <y> <z>", name));
    ctx.output.info(&format!("  danworld save {} --source <dump.json>", name));

    Ok(())
}
