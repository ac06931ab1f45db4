//! `danworld status` command implementation.

use dan_config::ExtraSpec;
use dan_core::error::DanResult;

use super::{CommandContext, CONSOLE_USER};

/// Execute the `danworld status` command
pub async fn execute(name: String, json: bool, ctx: &CommandContext) -> DanResult<()> {
    let workspace = ctx.workspace()?;
    workspace.load(CONSOLE_USER, &name)?;
    let status = workspace.status(CONSOLE_USER)?;

    if json {
        return ctx.output.json(&status);
    }

    let exported = workspace.world_path(&status.name)?.exists();

    ctx.output.line(&format!("World '{}'", status.name));
    ctx.output.field("dimension", status.dimension.as_str());
    ctx.output.field("selection", &status.selection.to_string());
    ctx.output.field(
        "chunks",
        &format!(
            "{}x{}, {} sections",
            status.selection.chunk_width(),
            status.selection.chunk_depth(),
            status.selection.section_count()
        ),
    );
    ctx.output.field("exported", if exported { "yes" } else { "no" });

    if status.extras.is_empty() {
        ctx.output.info("No extras defined");
    } else {
        ctx.output.line("");
        ctx.output.line("Extras:");
        for (key, spec) in &status.extras {
            let value = match spec {
                ExtraSpec::Position {
                    x,
                    y,
                    z,
                    yaw,
                    pitch,
                } => format!("position {} {} {} (yaw {}, pitch {})", x, y, z, yaw, pitch),
                ExtraSpec::Text { value } => format!("text {:?}", value),
            };
            ctx.output.line(&format!("  {} -> {}", key, value));
        }
    }

    Ok(())
}
