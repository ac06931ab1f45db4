//! Command implementations and dispatch logic.
//!
//! Each command is an async function taking a [`CommandContext`]. Project
//! commands act on behalf of a single console user: they load the named
//! project from the data directory, change it and write it back.

use camino::{Utf8Path, Utf8PathBuf};
use dan_config::{ConfigLoader, Settings};
use dan_core::error::{DanError, DanResult};
use dan_export::{ExportReport, Exporter, Workspace};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;

pub mod export;
pub mod inspect;
pub mod list;
pub mod new;
pub mod redefine;
pub mod save;
pub mod set;
pub mod status;
pub mod unset;

#[cfg(test)]
mod tests;

use crate::output::progress::ProgressBar;
use crate::output::OutputHandler;
use crate::Commands;

/// Session owner for commands run from the terminal
pub const CONSOLE_USER: &str = "console";

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub settings: Settings,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Resolve settings for the current directory
    pub async fn new(config: Option<&Utf8Path>, data_dir: Option<&Utf8Path>) -> DanResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| DanError::io("Failed to get current directory", e))?;
        let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| DanError::ConfigValidation {
            field: "cwd".to_string(),
            reason: format!("Current directory is not valid UTF-8: {}", e),
        })?;

        let mut cli_overrides = HashMap::new();
        if let Some(data_dir) = data_dir {
            cli_overrides.insert("data_dir".to_string(), data_dir.to_string());
        }

        let (settings, _) = ConfigLoader::new(cwd.clone())
            .load(config, cli_overrides)
            .await?;

        Ok(Self {
            cwd,
            settings,
            output: OutputHandler::new(),
        })
    }

    /// Resolve a path given on the command line
    pub fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_relative() {
            self.cwd.join(path)
        } else {
            path.to_path_buf()
        }
    }

    pub fn workspace(&self) -> DanResult<Workspace> {
        Workspace::open(self.settings.clone())
    }

    /// Exporter drawing a progress bar on stderr
    pub fn exporter(&self, label: &str) -> (Exporter, Arc<Mutex<ProgressBar>>) {
        let bar = Arc::new(Mutex::new(ProgressBar::new(0, label.to_string())));
        let sink = Arc::clone(&bar);
        let exporter = Exporter::new(&self.settings).with_progress(move |done, total| {
            if let Ok(mut bar) = sink.lock() {
                bar.update(done as u64, total as u64);
            }
        });
        (exporter, bar)
    }

    /// Print the summary of a written export
    pub fn report_export(&self, path: &Utf8Path, report: &ExportReport) {
        self.output.success(&format!("Wrote {}", path));
        self.output.field(
            "chunks",
            &format!("{} ({}x{})", report.chunks, report.width, report.depth),
        );
        self.output.field("sections", &report.sections.to_string());
        self.output.field("blocks", &report.blocks.to_string());
        self.output.field("data", &format!("{} blocks with properties", report.data_entries));
        self.output.field("size", &format!("{} bytes", report.bytes));
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> DanResult<()> {
    match command {
        Commands::Inspect {
            file,
            json,
            histogram,
        } => {
            info!("Inspecting {}", file.display());
            inspect::execute(file, json, histogram, ctx).await
        },
        Commands::Export {
            output,
            world,
            min,
            max,
            source,
            dimension,
        } => {
            info!("Exporting {} to {}", world, output);
            export::execute(export::ExportArgs {
                output,
                world,
                min,
                max,
                source,
                dimension,
            }, ctx)
            .await
        },
        Commands::New {
            name,
            world,
            min,
            max,
            dimension,
        } => {
            info!("Creating world project: {}", name);
            new::execute(name, world, min, max, dimension, ctx).await
        },
        Commands::Status { name, json } => status::execute(name, json, ctx).await,
        Commands::Redefine {
            name,
            min,
            max,
            world,
        } => {
            info!("Redefining {} to {} .. {}", name, min, max);
            redefine::execute(name, min, max, world, ctx).await
        },
        Commands::Set { name, value } => set::execute(name, value, ctx).await,
        Commands::Unset { name, key } => {
            info!("Removing extra {} from {}", key, name);
            unset::execute(name, key, ctx).await
        },
        Commands::Save { name, source } => {
            info!("Saving world project: {}", name);
            save::execute(name, source, ctx).await
        },
        Commands::List { json } => list::execute(json, ctx).await,
        Commands::Version => show_version(ctx).await,
    }
}

/// Inspect a file named directly on the command line
pub async fn execute_file(file: PathBuf, ctx: &CommandContext) -> DanResult<()> {
    let file_str = file.to_string_lossy();

    // Check if this might be a typo for a command
    if !file.exists() && !file_str.contains('.') && !file_str.contains('/') {
        if let Some(suggestion) = suggest_similar_command(&file_str) {
            ctx.output.error(&format!("Unknown command '{}'", file_str));
            ctx.output.info(&format!("Did you mean '{}'?", suggestion));
            ctx.output.info("");
            ctx.output.info("Run 'danworld --help' to see available commands.");
            return Err(DanError::ConfigValidation {
                field: "command".to_string(),
                reason: format!("Unknown command: {}", file_str),
            });
        }
    }

    inspect::execute(file, false, false, ctx).await
}

/// Show help information
pub async fn show_help(ctx: &CommandContext) -> DanResult<()> {
    ctx.output.line("danworld - DanWorld region export tool");
    ctx.output.line("");
    ctx.output.line("Usage: danworld [COMMAND] [OPTIONS]");
    ctx.output.line("       danworld <FILE>        Inspect a .dan file");
    ctx.output.line("");
    ctx.output.line("Files:");
    ctx.output.line("  inspect <file>         Summarize a .dan file");
    ctx.output.line("  export <out>           Export a region from a block dump");
    ctx.output.line("");
    ctx.output.line("World projects:");
    ctx.output.line("  new <name>             Create a world project");
    ctx.output.line("  status <name>          Show a world project");
    ctx.output.line("  redefine <name>        Change its bounds");
    ctx.output.line("  set <name> pos|str     Define an extra");
    ctx.output.line("  unset <name> <key>     Remove an extra");
    ctx.output.line("  save <name>            Export the world");
    ctx.output.line("  list                   List world projects");
    ctx.output.line("");
    ctx.output.line("Meta:");
    ctx.output.line("  version                Show version information");
    ctx.output.line("");
    ctx.output.info("Run 'danworld <command> --help' for more information on a command.");
    Ok(())
}

async fn show_version(ctx: &CommandContext) -> DanResult<()> {
    ctx.output.line(&format!("danworld v{}", env!("CARGO_PKG_VERSION")));
    ctx.output.field("format", &format!("DanWorld v{}", dan_format::FORMAT_VERSION));
    ctx.output.field("built", env!("BUILD_DATE"));
    ctx.output.field("target", env!("BUILD_TARGET"));
    ctx.output.field("rust", env!("RUSTC_VERSION"));
    Ok(())
}

/// Suggest similar commands based on edit distance
pub fn suggest_similar_command(input: &str) -> Option<String> {
    let commands = [
        "inspect", "export", "new", "status", "redefine", "set", "unset", "save", "list",
        "version",
        "help",
    ];

    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for &command in &commands {
        let distance = edit_distance(input, command);
        if distance < best_distance && distance <= 2 {
            best_distance = distance;
            best_match = Some(command);
        }
    }

    best_match.map(|s| s.to_string())
}

/// Levenshtein distance between two strings
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    // single rolling row
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, &ca) in a_chars.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }

    row[b_chars.len()]
}
