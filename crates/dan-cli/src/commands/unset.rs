//! `danworld unset` command implementation.

use dan_core::error::DanResult;

use super::{CommandContext, CONSOLE_USER};

/// Execute the `danworld unset` command
pub async fn execute(name: String, key: String, ctx: &CommandContext) -> DanResult<()> {
    let workspace = ctx.workspace()?;
    workspace.load(CONSOLE_USER, &name)?;
    workspace.remove_extra(CONSOLE_USER, &key)?;
    workspace.persist(CONSOLE_USER)?;

    ctx.output.success(&format!("Removed extra '{}' from '{}'", key, name));
    Ok(())
}
