//! In-memory container used by unit tests.

use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::Value;

use super::{under_prefix, Container, ContainerRef, ResourceStream};
use crate::error::{PackError, PackResult};
use crate::resource::{PackType, ResourceId};

/// A container backed by hash maps, with call counters.
///
/// Resources are served for every kind.
pub(crate) struct MockContainer {
    name: String,
    resources: HashMap<ResourceId, Vec<u8>>,
    root_files: HashMap<String, Vec<u8>>,
    metadata: HashMap<String, Value>,
    fail_close: bool,
    fail_reads: bool,
    close_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl MockContainer {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            resources: HashMap::new(),
            root_files: HashMap::new(),
            metadata: HashMap::new(),
            fail_close: false,
            fail_reads: false,
            close_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
        }
    }

    /// Add a resource given as `namespace:path`.
    pub(crate) fn with_resource(mut self, id: &str, data: &str) -> Self {
        let id: ResourceId = id.parse().expect("test identifier should be valid");
        self.resources.insert(id, data.as_bytes().to_vec());
        self
    }

    pub(crate) fn with_root_file(mut self, name: &str, data: &str) -> Self {
        self.root_files
            .insert(name.to_string(), data.as_bytes().to_vec());
        self
    }

    pub(crate) fn with_metadata(mut self, section: &str, value: Value) -> Self {
        self.metadata.insert(section.to_string(), value);
        self
    }

    pub(crate) fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub(crate) fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub(crate) fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub(crate) fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }
}

impl Container for MockContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_resource(&self, _kind: PackType, id: &ResourceId) -> bool {
        self.resources.contains_key(id)
    }

    fn get_resource(&self, kind: PackType, id: &ResourceId) -> PackResult<ResourceStream> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(PackError::Io(io::Error::other(format!(
                "{} is unreadable",
                self.name
            ))));
        }
        match self.resources.get(id) {
            Some(data) => Ok(Box::new(Cursor::new(data.clone()))),
            None => Err(PackError::not_found(kind.directory(), id.namespace(), id.path())),
        }
    }

    fn list_resources(
        &self,
        _kind: PackType,
        namespace: &str,
        path_prefix: &str,
        filter: &dyn Fn(&ResourceId) -> bool,
    ) -> HashSet<ResourceId> {
        self.resources
            .keys()
            .filter(|id| id.namespace() == namespace && under_prefix(id.path(), path_prefix))
            .filter(|id| filter(id))
            .cloned()
            .collect()
    }

    fn namespaces(&self, _kind: PackType) -> HashSet<String> {
        self.resources
            .keys()
            .map(|id| id.namespace().to_string())
            .collect()
    }

    fn root_resource(&self, file_name: &str) -> PackResult<Option<ResourceStream>> {
        Ok(self
            .root_files
            .get(file_name)
            .map(|data| Box::new(Cursor::new(data.clone())) as ResourceStream))
    }

    fn metadata_value(&self, section: &str) -> PackResult<Option<Value>> {
        Ok(self.metadata.get(section).cloned())
    }

    fn close(&self) -> PackResult<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            Err(PackError::Io(io::Error::other(format!(
                "{} refused to close",
                self.name
            ))))
        } else {
            Ok(())
        }
    }
}

/// Upcast a shared mock to a container handle.
pub(crate) fn handle(container: &Arc<MockContainer>) -> ContainerRef {
    container.clone()
}

/// Drain a stream into a string.
pub(crate) fn read_string(mut stream: ResourceStream) -> String {
    let mut out = String::new();
    stream
        .read_to_string(&mut out)
        .expect("stream should be readable");
    out
}

/// Names of a sequence of containers, for order assertions.
pub(crate) fn names<'a>(containers: impl IntoIterator<Item = &'a ContainerRef>) -> Vec<String> {
    containers
        .into_iter()
        .map(|c| c.name().to_string())
        .collect()
}
