//! `danworld set` command implementation.
//!
//! Defines an extra on a project and prints its encoded bytes.

use dan_config::ExtraSpec;
use dan_core::error::DanResult;

use super::{CommandContext, CONSOLE_USER};
use crate::ExtraCommand;

/// Execute the `danworld set` command
pub async fn execute(name: String, value: ExtraCommand, ctx: &CommandContext) -> DanResult<()> {
    let (key, spec) = match value {
        ExtraCommand::Pos {
            key,
            x,
            y,
            z,
            yaw,
            pitch,
        } => (
            key,
            ExtraSpec::Position {
                x,
                y,
                z,
                yaw,
                pitch,
            },
        ),
        ExtraCommand::Str { key, text } => (
            key,
            ExtraSpec::Text {
                value: text.join(" "),
            },
        ),
    };

    let workspace = ctx.workspace()?;
    workspace.load(CONSOLE_USER, &name)?;
    let extra = workspace.set_extra(CONSOLE_USER, &key, spec)?;
    workspace.persist(CONSOLE_USER)?;

    ctx.output.line(&format!("{} -> {:?}", key, extra.data));
    Ok(())
}
