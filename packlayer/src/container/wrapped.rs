//! Aggregate that borrows its identity from a designated base member.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use super::group::{join_names, GroupContainer};
use super::{Container, ContainerRef, ResourceStream};
use crate::error::PackResult;
use crate::resource::{PackType, ResourceId};

/// A group container which wraps a "base" container.
///
/// The aggregate presents itself as the base: name, display name, root files
/// and metadata all come from it. Namespaced resources are still resolved
/// across every member with the usual priority rules.
pub struct WrappedGroupContainer {
    group: GroupContainer,
    base: ContainerRef,
}

impl WrappedGroupContainer {
    /// Wrap `base` together with `members`.
    ///
    /// If `base` is not already one of `members` (by identity), it is added
    /// at the end when `base_priority` is true, so it wins every tie, or at
    /// the front otherwise. When `base` is already present the caller's
    /// placement stands and `base_priority` is ignored.
    pub fn new(
        kind: PackType,
        base: ContainerRef,
        mut members: Vec<ContainerRef>,
        base_priority: bool,
    ) -> Self {
        if !members.iter().any(|m| Arc::ptr_eq(m, &base)) {
            if base_priority {
                members.push(Arc::clone(&base));
            } else {
                members.insert(0, Arc::clone(&base));
            }
        }

        let group = GroupContainer::new(kind, base.name(), members);
        Self { group, base }
    }

    /// The identity-bearing member.
    pub fn base(&self) -> &ContainerRef {
        &self.base
    }

    /// The underlying aggregate.
    pub fn group(&self) -> &GroupContainer {
        &self.group
    }

    /// All members in priority order, base included.
    pub fn members(&self) -> &[ContainerRef] {
        self.group.members()
    }

    /// Lazily walk the leaf containers.
    pub fn stream_leaves(&self) -> Box<dyn Iterator<Item = ContainerRef> + '_> {
        self.group.stream_leaves()
    }

    /// Base name followed by the names of every other member.
    pub fn full_name(&self) -> String {
        let others = self
            .group
            .members()
            .iter()
            .filter(|m| !Arc::ptr_eq(*m, &self.base));
        format!("{} ({})", self.base.name(), join_names(others))
    }
}

impl Container for WrappedGroupContainer {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn display_name(&self) -> String {
        self.base.name().to_string()
    }

    fn has_resource(&self, kind: PackType, id: &ResourceId) -> bool {
        self.group.has_resource(kind, id)
    }

    fn get_resource(&self, kind: PackType, id: &ResourceId) -> PackResult<ResourceStream> {
        self.group.get_resource(kind, id)
    }

    fn list_resources(
        &self,
        kind: PackType,
        namespace: &str,
        path_prefix: &str,
        filter: &dyn Fn(&ResourceId) -> bool,
    ) -> HashSet<ResourceId> {
        self.group
            .list_resources(kind, namespace, path_prefix, filter)
    }

    fn namespaces(&self, kind: PackType) -> HashSet<String> {
        self.group.namespaces(kind)
    }

    fn root_resource(&self, file_name: &str) -> PackResult<Option<ResourceStream>> {
        self.base.root_resource(file_name)
    }

    fn metadata_value(&self, section: &str) -> PackResult<Option<Value>> {
        self.base.metadata_value(section)
    }

    fn close(&self) -> PackResult<()> {
        self.group.close()
    }

    fn as_group(&self) -> Option<&GroupContainer> {
        Some(&self.group)
    }
}

impl std::fmt::Debug for WrappedGroupContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrappedGroupContainer")
            .field("base", &self.base.name())
            .field("group", &self.group)
            .finish()
    }
}
