//! Resource lookup commands: `get`, `which` and `list`.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use packlayer::container::{Container, WrappedGroupContainer};
use packlayer::{PackError, PackType, ResourceId};

use super::common::parse_id;
use crate::error::CliError;

/// Copy a resource's bytes to `output` or stdout.
pub fn run_get(
    pack: &WrappedGroupContainer,
    kind: PackType,
    id: &str,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let id = parse_id(id)?;
    let mut stream = pack.get_resource(kind, &id)?;

    match output {
        Some(path) => {
            let mut file = File::create(path)?;
            let bytes = io::copy(&mut stream, &mut file)?;
            eprintln!("Wrote {} bytes to {}", bytes, path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            io::copy(&mut stream, &mut lock)?;
            lock.flush()?;
        }
    }

    Ok(())
}

/// Print the pack that serves a resource.
pub fn run_which(pack: &WrappedGroupContainer, kind: PackType, id: &str) -> Result<(), CliError> {
    let id = parse_id(id)?;

    match pack.group().resolve_member(kind, &id) {
        Some(member) => {
            println!("{} -> {}", id, member.name());
            let shadowed: Vec<_> = pack
                .group()
                .members_for(id.namespace())
                .iter()
                .rev()
                .skip_while(|m| !Arc::ptr_eq(*m, member))
                .skip(1)
                .filter(|m| m.has_resource(kind, &id))
                .map(|m| m.name().to_string())
                .collect();
            if !shadowed.is_empty() {
                println!("  shadows: {}", shadowed.join(", "));
            }
            Ok(())
        }
        None => Err(PackError::not_found(kind.directory(), id.namespace(), id.path()).into()),
    }
}

/// Print the union listing of a namespace, sorted.
pub fn run_list(
    pack: &WrappedGroupContainer,
    kind: PackType,
    namespace: &str,
    prefix: &str,
    suffix: Option<&str>,
) -> Result<(), CliError> {
    let filter = |id: &ResourceId| suffix_matches(id, suffix);
    let mut resources: Vec<_> = pack
        .list_resources(kind, namespace, prefix, &filter)
        .into_iter()
        .collect();
    resources.sort();

    for id in &resources {
        println!("{}", id);
    }
    eprintln!("{} resource(s)", resources.len());
    Ok(())
}

fn suffix_matches(id: &ResourceId, suffix: Option<&str>) -> bool {
    suffix.map_or(true, |s| id.path().ends_with(s))
}
