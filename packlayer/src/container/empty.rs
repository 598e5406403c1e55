//! Placeholder container with identity and metadata but no resources.

use std::collections::HashSet;

use serde_json::Value;

use super::{Container, ResourceStream};
use crate::error::{PackError, PackResult};
use crate::metadata::PackMetadataSection;
use crate::resource::{PackType, ResourceId};

/// A container that serves nothing.
///
/// Used as the base of a wrapped aggregate so the aggregate has a stable
/// name and `pack` metadata even when no real packs were discovered.
#[derive(Debug, Clone)]
pub struct EmptyContainer {
    /// Identifying name (e.g. `packlayer_global`).
    id: String,

    /// Name shown to users (e.g. "Global Resources").
    display_name: String,

    /// The `pack` metadata section.
    metadata: PackMetadataSection,
}

impl EmptyContainer {
    /// Create a new placeholder.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        metadata: PackMetadataSection,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            metadata,
        }
    }

    /// The `pack` metadata section.
    pub fn metadata(&self) -> &PackMetadataSection {
        &self.metadata
    }
}

impl Container for EmptyContainer {
    fn name(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> String {
        self.display_name.clone()
    }

    fn has_resource(&self, _kind: PackType, _id: &ResourceId) -> bool {
        false
    }

    fn get_resource(&self, kind: PackType, id: &ResourceId) -> PackResult<ResourceStream> {
        Err(PackError::not_found(kind.directory(), id.namespace(), id.path()))
    }

    fn list_resources(
        &self,
        _kind: PackType,
        _namespace: &str,
        _path_prefix: &str,
        _filter: &dyn Fn(&ResourceId) -> bool,
    ) -> HashSet<ResourceId> {
        HashSet::new()
    }

    fn namespaces(&self, _kind: PackType) -> HashSet<String> {
        HashSet::new()
    }

    fn root_resource(&self, _file_name: &str) -> PackResult<Option<ResourceStream>> {
        Ok(None)
    }

    fn metadata_value(&self, section: &str) -> PackResult<Option<Value>> {
        if section == "pack" {
            self.metadata.to_value().map(Some)
        } else {
            Ok(None)
        }
    }

    fn close(&self) -> PackResult<()> {
        Ok(())
    }
}
