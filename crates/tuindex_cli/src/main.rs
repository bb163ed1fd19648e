//! tuindex CLI: query the translation-unit cache from the command line.
//!
//! Provides `tuindex lookup` for resolving source and header files to the
//! translation unit that serves them, and `tuindex sources` for listing the
//! source files the compile-command database knows about.

#![warn(missing_docs)]

mod lookup;
mod pipeline;
mod sources;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// tuindex: an incremental translation-unit cache for C-family sources.
#[derive(Parser, Debug)]
#[command(name = "tuindex", version, about = "Translation unit index")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Raise verbosity; repeat for more detail.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to a custom `tuindex.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Path to `compile_commands.json`, overriding the configuration.
    #[arg(long, global = true)]
    pub compile_commands: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the translation unit serving each file.
    Lookup(LookupArgs),
    /// List known source files and their compile arguments.
    Sources(SourcesArgs),
}

/// Arguments for the `tuindex lookup` subcommand.
#[derive(Parser, Debug)]
pub struct LookupArgs {
    /// Source or header files to resolve.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `tuindex sources` subcommand.
#[derive(Parser, Debug)]
pub struct SourcesArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
#[derive(Debug)]
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Number of `-v` flags given.
    pub verbose: u8,
    /// Optional path to a custom config file.
    pub config: Option<String>,
    /// Optional path to the compile-command database.
    pub compile_commands: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
        compile_commands: cli.compile_commands,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Lookup(ref args) => lookup::run(args, &global),
        Command::Sources(ref args) => sources::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over the flags.
fn init_logging(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(global)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_log_level(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        return "error";
    }
    match global.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
