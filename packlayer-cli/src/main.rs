//! PackLayer CLI - Command-line interface
//!
//! Inspects the global pack built from a resources folder: which packs were
//! found, which one serves a resource, and what each namespace contains.

mod commands;
mod error;

use std::path::PathBuf;

use clap::Parser;
use packlayer::config::ConfigFile;
use packlayer::logging::init_logging;

use commands::common::KindArg;
use commands::Commands;
use error::CliError;

/// Inspect layered resource pack overlays.
#[derive(Debug, Parser)]
#[command(name = "packlayer", version, about)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Global resources folder, overriding the configuration
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Resource kind to inspect
    #[arg(long, value_enum, default_value_t = KindArg::Assets, global = true)]
    kind: KindArg,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    if let Some(dir) = cli.dir {
        config.packs.global_dir = dir;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    let _guard = init_logging(&config.logging)?;
    tracing::debug!(version = packlayer::VERSION, "Starting");

    commands::run(cli.command, &config, cli.kind.into())
}
