//! Zip-backed container.
//!
//! The archive uses the same layout as a folder pack. The handle is opened
//! on first access and released by [`Container::close`].

use std::collections::HashSet;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

use super::{is_safe_relative, under_prefix, Container, ResourceStream};
use crate::error::{PackError, PackResult};
use crate::metadata::{parse_mcmeta, PackMetadataSection, PACK_METADATA_FILE};
use crate::resource::{is_valid_namespace, PackType, ResourceId};

/// Lifecycle of the archive handle.
enum ArchiveState {
    Unopened,
    Open(ZipArchive<File>),
    Closed,
}

/// A pack stored as a `.zip` file.
pub struct ZipContainer {
    /// Name of the pack (archive file name).
    name: String,

    /// Path to the archive.
    path: PathBuf,

    /// Kind used when synthesizing metadata.
    kind: PackType,

    archive: Mutex<ArchiveState>,
}

impl ZipContainer {
    /// Create a container over the archive at `path`.
    ///
    /// The archive is not opened until first use; see [`ZipContainer::open`]
    /// to validate it eagerly.
    pub fn new(kind: PackType, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            path,
            kind,
            archive: Mutex::new(ArchiveState::Unopened),
        }
    }

    /// Create a container and open the archive immediately.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened or is not a valid zip archive.
    pub fn open(kind: PackType, path: impl Into<PathBuf>) -> PackResult<Self> {
        let container = Self::new(kind, path);
        let archive = open_archive(&container.path)?;
        *container.archive.lock() = ArchiveState::Open(archive);
        Ok(container)
    }

    /// Path to the archive.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the handle has been released.
    pub fn is_closed(&self) -> bool {
        matches!(*self.archive.lock(), ArchiveState::Closed)
    }

    /// Run `f` against the open archive, opening it if needed.
    fn with_archive<T>(
        &self,
        f: impl FnOnce(&mut ZipArchive<File>) -> PackResult<T>,
    ) -> PackResult<T> {
        let mut state = self.archive.lock();
        match &mut *state {
            ArchiveState::Open(archive) => return f(archive),
            ArchiveState::Closed => {
                return Err(PackError::Closed {
                    name: self.name.clone(),
                })
            }
            ArchiveState::Unopened => {}
        }

        let mut archive = open_archive(&self.path)?;
        let result = f(&mut archive);
        *state = ArchiveState::Open(archive);
        result
    }

    /// Read an entry fully, returning `None` if it does not exist.
    fn read_entry(&self, entry: &str) -> PackResult<Option<Vec<u8>>> {
        self.with_archive(|archive| {
            let mut file = match archive.by_name(entry) {
                Ok(file) if file.is_dir() => return Ok(None),
                Ok(file) => file,
                Err(ZipError::FileNotFound) => return Ok(None),
                Err(source) => {
                    return Err(PackError::Archive {
                        path: self.path.clone(),
                        source,
                    })
                }
            };
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            Ok(Some(buf))
        })
    }

    /// Names of every entry in the archive.
    fn entry_names(&self) -> PackResult<Vec<String>> {
        self.with_archive(|archive| Ok(archive.file_names().map(str::to_string).collect()))
    }

    fn entry_names_or_empty(&self) -> Vec<String> {
        self.entry_names().unwrap_or_else(|e| {
            debug!(pack = %self.name, error = %e, "Cannot enumerate archive");
            Vec::new()
        })
    }
}

impl Container for ZipContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_resource(&self, kind: PackType, id: &ResourceId) -> bool {
        if !is_safe_relative(id.path()) {
            return false;
        }
        let entry = id.qualified_path(kind);
        self.with_archive(|archive| match archive.by_name(&entry) {
            Ok(file) => Ok(!file.is_dir()),
            Err(_) => Ok(false),
        })
        .unwrap_or(false)
    }

    fn get_resource(&self, kind: PackType, id: &ResourceId) -> PackResult<ResourceStream> {
        let not_found = || PackError::not_found(kind.directory(), id.namespace(), id.path());
        if !is_safe_relative(id.path()) {
            return Err(not_found());
        }

        match self.read_entry(&id.qualified_path(kind))? {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes))),
            None => Err(not_found()),
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
        let base = format!("{}/{}/", kind.directory(), namespace);

        for entry in self.entry_names_or_empty() {
            let Some(relative) = entry.strip_prefix(&base) else {
                continue;
            };
            if relative.is_empty() || relative.ends_with('/') || relative.ends_with(".mcmeta") {
                continue;
            }
            if !under_prefix(relative, path_prefix) {
                continue;
            }
            match ResourceId::try_new(namespace, relative) {
                Ok(id) if filter(&id) => {
                    resources.insert(id);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(pack = %self.name, error = %e, "Skipping invalid resource path");
                }
            }
        }

        resources
    }

    fn namespaces(&self, kind: PackType) -> HashSet<String> {
        let mut namespaces = HashSet::new();
        let base = format!("{}/", kind.directory());

        for entry in self.entry_names_or_empty() {
            let Some(rest) = entry.strip_prefix(&base) else {
                continue;
            };
            // Only segments followed by a '/' are directories.
            let Some((namespace, _)) = rest.split_once('/') else {
                continue;
            };
            if is_valid_namespace(namespace) {
                namespaces.insert(namespace.to_string());
            } else {
                warn!(pack = %self.name, namespace = %namespace, "Ignoring invalid namespace directory");
            }
        }

        namespaces
    }

    fn root_resource(&self, file_name: &str) -> PackResult<Option<ResourceStream>> {
        if !is_safe_relative(file_name) {
            return Ok(None);
        }
        Ok(self
            .read_entry(file_name)?
            .map(|bytes| Box::new(Cursor::new(bytes)) as ResourceStream))
    }

    fn metadata_value(&self, section: &str) -> PackResult<Option<Value>> {
        match self.read_entry(PACK_METADATA_FILE)? {
            Some(bytes) => {
                let mut sections =
                    parse_mcmeta(&bytes).map_err(|reason| PackError::InvalidMetadata {
                        pack: self.name.clone(),
                        reason,
                    })?;
                Ok(sections.remove(section))
            }
            None if section == "pack" => PackMetadataSection::synthesized(&self.name, self.kind)
                .to_value()
                .map(Some),
            None => Ok(None),
        }
    }

    fn close(&self) -> PackResult<()> {
        let mut state = self.archive.lock();
        if !matches!(*state, ArchiveState::Closed) {
            debug!(pack = %self.name, "Releasing archive handle");
        }
        *state = ArchiveState::Closed;
        Ok(())
    }
}

impl std::fmt::Debug for ZipContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipContainer")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn open_archive(path: &Path) -> PackResult<ZipArchive<File>> {
    let file = File::open(path)?;
    ZipArchive::new(file).map_err(|source| PackError::Archive {
        path: path.to_path_buf(),
        source,
    })
}
