//! Aggregate container merging an ordered list of members.
//!
//! This module provides the [`GroupContainer`] which presents several
//! containers as one, similar to an overlay filesystem. Members are ordered
//! by priority: the last member wins when several supply the same resource.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::{Container, ContainerRef, ResourceStream};
use crate::error::{CloseFailure, PackError, PackResult};
use crate::resource::{PackType, ResourceId};

/// Ordered aggregate of containers with a namespace index.
///
/// The index is built once in [`GroupContainer::new`] and never changes, so
/// lookups need no locking.
///
/// # Resolution Rules
///
/// - **Fetching** scans the members declaring the namespace from last to
///   first and serves the first one that has the resource.
/// - **Listing** collects the matches of every member declaring the
///   namespace; duplicates collapse into one identifier.
///
/// # Example
///
/// ```ignore
/// use packlayer::{GroupContainer, PackType, ResourceId};
///
/// let group = GroupContainer::new(PackType::ClientResources, "bundle", vec![low, high]);
/// let id = ResourceId::new("minecraft", "lang/en_us.json");
///
/// // Served by `high` when both packs provide it
/// let stream = group.get_resource(PackType::ClientResources, &id)?;
/// ```
pub struct GroupContainer {
    /// Kind of resources the namespace index was built for.
    kind: PackType,

    /// Name reported for the aggregate.
    name: String,

    /// Members in priority order (last = highest priority).
    members: Vec<ContainerRef>,

    /// Map from namespace to the members declaring it, in member order.
    index: HashMap<String, Vec<ContainerRef>>,
}

impl GroupContainer {
    /// Build an aggregate over `members`.
    ///
    /// Members should already be sorted by priority, lowest first.
    /// An empty member list is legal and resolves nothing.
    pub fn new(kind: PackType, name: impl Into<String>, members: Vec<ContainerRef>) -> Self {
        let name = name.into();
        let mut index: HashMap<String, Vec<ContainerRef>> = HashMap::new();

        for member in &members {
            for namespace in member.namespaces(kind) {
                index.entry(namespace).or_default().push(Arc::clone(member));
            }
        }

        debug!(
            group = %name,
            kind = %kind,
            members = members.len(),
            namespaces = index.len(),
            "Built namespace index"
        );

        Self {
            kind,
            name,
            members,
            index,
        }
    }

    /// Kind of resources this aggregate serves.
    pub fn kind(&self) -> PackType {
        self.kind
    }

    /// All members in priority order (last = highest priority).
    pub fn members(&self) -> &[ContainerRef] {
        &self.members
    }

    /// Members declaring `namespace`, in priority order.
    ///
    /// Returns an empty slice when no member declares it.
    pub fn members_for(&self, namespace: &str) -> &[ContainerRef] {
        self.index
            .get(namespace)
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }

    /// Find the member that serves `id`.
    ///
    /// Returns `None` if no member has the resource.
    pub fn resolve_member(&self, kind: PackType, id: &ResourceId) -> Option<&ContainerRef> {
        // Higher-priority members sit at the end.
        self.members_for(id.namespace())
            .iter()
            .rev()
            .find(|member| member.has_resource(kind, id))
    }

    /// Lazily walk the leaf containers, expanding nested aggregates in place.
    ///
    /// The walk preserves member order at every level and can be restarted
    /// by calling this method again.
    pub fn stream_leaves<'a>(&'a self) -> Box<dyn Iterator<Item = ContainerRef> + 'a> {
        Box::new(self.members.iter().flat_map(
            |member| -> Box<dyn Iterator<Item = ContainerRef> + 'a> {
                match member.as_group() {
                    Some(group) => group.stream_leaves(),
                    None => Box::new(std::iter::once(Arc::clone(member))),
                }
            },
        ))
    }

    /// Name followed by the names of every member.
    pub fn full_name(&self) -> String {
        format!("{} ({})", self.name, join_names(self.members.iter()))
    }
}

impl Container for GroupContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_resource(&self, kind: PackType, id: &ResourceId) -> bool {
        self.resolve_member(kind, id).is_some()
    }

    fn get_resource(&self, kind: PackType, id: &ResourceId) -> PackResult<ResourceStream> {
        match self.resolve_member(kind, id) {
            Some(member) => {
                debug!(resource = %id, member = member.name(), "Resolved resource");
                member.get_resource(kind, id)
            }
            None => Err(PackError::not_found(
                kind.directory(),
                id.namespace(),
                id.path(),
            )),
        }
    }

    fn list_resources(
        &self,
        kind: PackType,
        namespace: &str,
        path_prefix: &str,
        filter: &dyn Fn(&ResourceId) -> bool,
    ) -> HashSet<ResourceId> {
        let mut resources = HashSet::new();
        for member in self.members_for(namespace).iter().rev() {
            resources.extend(member.list_resources(kind, namespace, path_prefix, filter));
        }

        resources
    }

    fn namespaces(&self, _kind: PackType) -> HashSet<String> {
        self.index.keys().cloned().collect()
    }

    /// Plain groups carry no root files of their own.
    fn root_resource(&self, _file_name: &str) -> PackResult<Option<ResourceStream>> {
        Ok(None)
    }

    fn metadata_value(&self, _section: &str) -> PackResult<Option<Value>> {
        Ok(None)
    }

    fn close(&self) -> PackResult<()> {
        let mut failures = Vec::new();

        for member in &self.members {
            if let Err(e) = member.close() {
                warn!(group = %self.name, member = member.name(), error = %e, "Failed to close member");
                failures.push(CloseFailure::new(member.name(), e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(PackError::Close { failures })
        }
    }

    fn as_group(&self) -> Option<&GroupContainer> {
        Some(self)
    }
}

impl std::fmt::Debug for GroupContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupContainer")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("members", &names_of(self.members.iter()))
            .finish()
    }
}

pub(super) fn join_names<'a>(members: impl Iterator<Item = &'a ContainerRef>) -> String {
    names_of(members).join(", ")
}

fn names_of<'a>(members: impl Iterator<Item = &'a ContainerRef>) -> Vec<&'a str> {
    members.map(|m| m.name()).collect()
}
