//! `danworld redefine` command implementation.

use dan_core::error::DanResult;
use dan_core::types::Selection;

use super::{CommandContext, CONSOLE_USER};

/// Execute the `danworld redefine` command
pub async fn execute(
    name: String,
    min: String,
    max: String,
    world: Option<String>,
    ctx: &CommandContext,
) -> DanResult<()> {
    let workspace = ctx.workspace()?;
    let project = workspace.load(CONSOLE_USER, &name)?;

    let world = world.unwrap_or(project.selection.world);
    let selection = Selection::from_strings(&world, &min, &max)?;
    let stranded = workspace.redefine(CONSOLE_USER, selection.clone())?;
    workspace.persist(CONSOLE_USER)?;

    ctx.output.success(&format!("Redefined '{}' to {}", name, selection));
    for key in &stranded {
        ctx.output.warn(&format!(
            "Extra '{}' is outside the new bounds; move it or run 'danworld unset {} {}'",
            key, name, key
        ));
    }
    ctx.output.info(&format!("Run 'danworld save {}' to export the new bounds", name));
    Ok(())
}
