//! # danworld
//!
//! Command line tool for DanWorld region files.
//!
//! This is the entry point of the `danworld` binary. It parses arguments,
//! resolves settings, sets up logging and error reporting, and dispatches
//! to the command handlers.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use dan_core::error::{DanError, DanResult};
use dan_core::types::Dimension;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Export voxel regions to DanWorld files and inspect them
#[derive(Parser)]
#[command(name = "danworld", version, about = "DanWorld region export tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// World file to inspect directly
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to use instead of the nearest danworld.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Directory holding world projects and exports
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<Utf8PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize a .dan file
    Inspect {
        file: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        /// Count blocks per material
        #[arg(long)]
        histogram: bool,
    },
    /// Export a region from a block dump in one step
    Export {
        /// Output .dan file
        output: Utf8PathBuf,
        #[arg(long, default_value = "world")]
        world: String,
        /// First corner, x:y:z
        #[arg(long, allow_hyphen_values = true)]
        min: String,
        /// Opposite corner, x:y:z
        #[arg(long, allow_hyphen_values = true)]
        max: String,
        /// JSON block dump to sample
        #[arg(long)]
        source: Utf8PathBuf,
        #[arg(long, default_value = "overworld")]
        dimension: Dimension,
    },
    /// Create a world project
    New {
        name: String,
        #[arg(long, default_value = "world")]
        world: String,
        #[arg(long, allow_hyphen_values = true)]
        min: String,
        #[arg(long, allow_hyphen_values = true)]
        max: String,
        #[arg(long, default_value = "overworld")]
        dimension: Dimension,
    },
    /// Show a world project
    Status {
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Change the bounds of a world project
    Redefine {
        name: String,
        #[arg(long, allow_hyphen_values = true)]
        min: String,
        #[arg(long, allow_hyphen_values = true)]
        max: String,
        /// Move the selection to another world
        #[arg(long)]
        world: Option<String>,
    },
    /// Define an extra on a world project
    Set {
        name: String,
        #[command(subcommand)]
        value: ExtraCommand,
    },
    /// Remove an extra from a world project
    Unset {
        name: String,
        key: String,
    },
    /// Write a world project and export its world
    Save {
        name: String,
        /// JSON block dump to sample
        #[arg(long)]
        source: Utf8PathBuf,
    },
    /// List world projects
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ExtraCommand {
    /// A position with view angles, in world coordinates
    Pos {
        key: String,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        yaw: f32,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        pitch: f32,
    },
    /// A text message
    Str {
        key: String,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_panic_handler();

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", ErrorFormatter::new().format_error(&e));
            ExitCode::FAILURE
        },
    }
}

fn run_cli(cli: Cli) -> DanResult<()> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| DanError::io("Failed to create async runtime", e))?;

    rt.block_on(async {
        let ctx = CommandContext::new(cli.config.as_deref(), cli.data_dir.as_deref()).await?;

        setup_logging(cli.verbose, &ctx.settings.log_level);
        info!("Starting danworld v{}", env!("CARGO_PKG_VERSION"));

        match cli.command {
            Some(command) => commands::dispatch_command(command, &ctx).await,
            None => match cli.file {
                Some(file) => commands::execute_file(file, &ctx).await,
                None => commands::show_help(&ctx).await,
            },
        }
    })
}

fn setup_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    let directives = ["danworld", "dan_core", "dan_format", "dan_config", "dan_export"]
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",");

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("danworld encountered an unexpected error: {}", panic_info);
        eprintln!("danworld crashed! This is a bug.");
        eprintln!("Error: {}", panic_info);
    }));
}
