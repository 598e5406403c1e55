//! CLI subcommands.

pub mod common;
mod info;
mod resource;

use std::path::PathBuf;

use clap::Subcommand;
use packlayer::config::ConfigFile;
use packlayer::PackType;

use crate::error::CliError;

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the global pack, its leaf packs and namespaces
    Info,

    /// Write the bytes of a resource to stdout or a file
    Get {
        /// Resource identifier (namespace:path)
        id: String,

        /// Output file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which pack serves a resource
    Which {
        /// Resource identifier (namespace:path)
        id: String,
    },

    /// List resources in a namespace across every pack
    List {
        /// Namespace to list
        namespace: String,

        /// Only paths under this directory
        #[arg(long, default_value = "")]
        prefix: String,

        /// Only paths ending with this suffix (e.g. .png)
        #[arg(long)]
        suffix: Option<String>,
    },
}

/// Run a subcommand against a freshly built global pack.
pub fn run(command: Commands, config: &ConfigFile, kind: PackType) -> Result<(), CliError> {
    let mut session = common::open_session(config, kind);
    let pack = session.reload();

    let result = match command {
        Commands::Info => info::run(&pack, kind),
        Commands::Get { id, output } => resource::run_get(&pack, kind, &id, output.as_deref()),
        Commands::Which { id } => resource::run_which(&pack, kind, &id),
        Commands::List {
            namespace,
            prefix,
            suffix,
        } => resource::run_list(&pack, kind, &namespace, &prefix, suffix.as_deref()),
    };

    session.close()?;
    result
}
