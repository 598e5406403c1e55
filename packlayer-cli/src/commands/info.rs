//! `info` command.

use packlayer::container::{Container, WrappedGroupContainer};
use packlayer::discovery::leaf_names;
use packlayer::PackType;

use crate::error::CliError;

/// Print the global pack summary.
pub fn run(pack: &WrappedGroupContainer, kind: PackType) -> Result<(), CliError> {
    println!("Pack:       {}", pack.display_name());
    println!("Full name:  {}", pack.full_name());
    println!("Kind:       {}", kind);

    let leaves = leaf_names(pack);
    println!();
    println!("Packs ({}, lowest priority first):", leaves.len());
    for name in &leaves {
        println!("  {}", name);
    }

    let mut namespaces: Vec<_> = pack.namespaces(kind).into_iter().collect();
    namespaces.sort();
    println!();
    println!("Namespaces ({}):", namespaces.len());
    for namespace in &namespaces {
        let providers: Vec<_> = pack
            .group()
            .members_for(namespace)
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        println!("  {:<20} {}", namespace, providers.join(", "));
    }

    Ok(())
}
