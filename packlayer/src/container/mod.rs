//! The container contract and its implementations.
//!
//! A [`Container`] is anything that serves namespaced, path-addressed
//! resources plus a few pack-global accessors (root files and metadata).
//! Aggregates ([`GroupContainer`], [`WrappedGroupContainer`]) implement the
//! same contract, so they can be nested inside other aggregates.
//!
//! # Implementations
//!
//! | Type | Backing |
//! |------|---------|
//! | [`FolderContainer`] | A directory on disk |
//! | [`ZipContainer`] | A `.zip` archive |
//! | [`EmptyContainer`] | Nothing; identity and metadata only |
//! | [`GroupContainer`] | An ordered list of other containers |
//! | [`WrappedGroupContainer`] | A group with a designated base member |

mod archive;
mod empty;
mod folder;
mod group;
mod wrapped;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::HashSet;
use std::io::Read;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{PackError, PackResult};
use crate::metadata::MetadataSectionReader;
use crate::resource::{PackType, ResourceId};

pub use archive::ZipContainer;
pub use empty::EmptyContainer;
pub use folder::FolderContainer;
pub use group::GroupContainer;
pub use wrapped::WrappedGroupContainer;

/// Byte stream handed out for a resource.
pub type ResourceStream = Box<dyn Read + Send>;

/// Shared handle to a container. Identity is pointer identity.
pub type ContainerRef = Arc<dyn Container>;

/// A provider of namespaced resources.
///
/// Implementations must be safe to query from several threads at once.
pub trait Container: Send + Sync {
    /// Short identifying name.
    fn name(&self) -> &str;

    /// Human-readable name.
    fn display_name(&self) -> String {
        self.name().to_string()
    }

    /// Check whether a resource of the given kind exists.
    fn has_resource(&self, kind: PackType, id: &ResourceId) -> bool;

    /// Open a resource for reading.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::ResourceNotFound`] when the resource is absent,
    /// or the underlying I/O error when reading fails.
    fn get_resource(&self, kind: PackType, id: &ResourceId) -> PackResult<ResourceStream>;

    /// List identifiers under `namespace` whose path starts with `path_prefix`
    /// and that pass `filter`.
    fn list_resources(
        &self,
        kind: PackType,
        namespace: &str,
        path_prefix: &str,
        filter: &dyn Fn(&ResourceId) -> bool,
    ) -> HashSet<ResourceId>;

    /// Namespaces this container declares for the given kind.
    fn namespaces(&self, kind: PackType) -> HashSet<String>;

    /// Open a pack-global (non-namespaced) file such as `pack.png`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    fn root_resource(&self, file_name: &str) -> PackResult<Option<ResourceStream>>;

    /// Raw value of a metadata section, if present.
    fn metadata_value(&self, section: &str) -> PackResult<Option<Value>>;

    /// Release underlying handles.
    fn close(&self) -> PackResult<()>;

    /// View this container as an aggregate, if it is one.
    ///
    /// Used to flatten nested aggregates into their leaves.
    fn as_group(&self) -> Option<&GroupContainer> {
        None
    }
}

/// Typed helpers available on every container.
pub trait ContainerExt: Container {
    /// Read and decode a metadata section.
    fn metadata_section<R: MetadataSectionReader>(
        &self,
        reader: &R,
    ) -> PackResult<Option<R::Output>> {
        match self.metadata_value(reader.section_name())? {
            Some(value) => reader
                .read(&value)
                .map(Some)
                .map_err(|reason| PackError::InvalidMetadata {
                    pack: self.name().to_string(),
                    reason,
                }),
            None => Ok(None),
        }
    }

    /// Read a whole resource into memory.
    fn read_resource(&self, kind: PackType, id: &ResourceId) -> PackResult<Vec<u8>> {
        let mut stream = self.get_resource(kind, id)?;
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl<C: Container + ?Sized> ContainerExt for C {}

/// Convert a relative filesystem-style path into a resource path.
pub(crate) fn to_resource_path(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}

/// Check a relative path for components that would escape the pack.
pub(crate) fn is_safe_relative(path: &str) -> bool {
    !path.starts_with('/') && !path.contains('\\') && !path.split('/').any(|c| c == "..")
}

/// Directory-style prefix match: `textures` covers `textures/a.png`
/// but not `textures_old/a.png`. Empty and repeated separators in the prefix
/// are ignored.
pub(crate) fn under_prefix(relative: &str, prefix: &str) -> bool {
    let mut rest = relative;
    for component in prefix.split('/').filter(|c| !c.is_empty()) {
        match rest
            .strip_prefix(component)
            .and_then(|r| r.strip_prefix('/'))
        {
            Some(r) => rest = r,
            None => return false,
        }
    }
    true
}
