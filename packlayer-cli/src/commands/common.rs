//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;
use packlayer::config::ConfigFile;
use packlayer::session::PackSession;
use packlayer::{PackType, ResourceId};

use crate::error::CliError;

/// Resource kind selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum KindArg {
    /// Client assets (assets/)
    Assets,
    /// Server data (data/)
    Data,
}

impl From<KindArg> for PackType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Assets => PackType::ClientResources,
            KindArg::Data => PackType::ServerData,
        }
    }
}

/// Create a session over the configured global resources folder.
pub fn open_session(config: &ConfigFile, kind: PackType) -> PackSession {
    PackSession::new(kind, config.packs.clone())
}

/// Parse a `namespace:path` argument.
pub fn parse_id(id: &str) -> Result<ResourceId, CliError> {
    id.parse()
        .map_err(|_| CliError::InvalidArgument(format!("Invalid resource identifier '{}'", id)))
}
