//! Directory-backed container.
//!
//! Layout on disk:
//!
//! ```text
//! my_pack/
//! ├── pack.mcmeta            # Optional; synthesized when missing
//! ├── pack.png               # Root resource
//! └── assets/                # One directory per resource kind
//!     └── minecraft/         # Namespace
//!         └── lang/en_us.json
//! ```

use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use super::{is_safe_relative, Container, ResourceStream};
use crate::error::{PackError, PackResult};
use crate::metadata::{parse_mcmeta, PackMetadataSection, PACK_METADATA_FILE};
use crate::resource::{is_valid_namespace, PackType, ResourceId};

/// A pack stored as a plain directory.
#[derive(Debug, Clone)]
pub struct FolderContainer {
    /// Name of the pack (folder name).
    name: String,

    /// Root directory of the pack.
    root: PathBuf,

    /// Kind used when synthesizing metadata.
    kind: PackType,
}

impl FolderContainer {
    /// Create a container over `root`, named after the folder.
    pub fn new(kind: PackType, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| root.display().to_string());
        Self { name, root, kind }
    }

    /// Root directory of the pack.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn namespace_dir(&self, kind: PackType, namespace: &str) -> PathBuf {
        self.root.join(kind.directory()).join(namespace)
    }

    fn resource_path(&self, kind: PackType, id: &ResourceId) -> Option<PathBuf> {
        if !is_valid_namespace(id.namespace()) || !is_safe_relative(id.path()) {
            return None;
        }
        let mut path = self.namespace_dir(kind, id.namespace());
        path.extend(id.path().split('/'));
        Some(path)
    }

    fn read_metadata(&self) -> PackResult<Option<serde_json::Map<String, Value>>> {
        let path = self.root.join(PACK_METADATA_FILE);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        parse_mcmeta(&bytes)
            .map(Some)
            .map_err(|reason| PackError::InvalidMetadata {
                pack: self.name.clone(),
                reason,
            })
    }
}

impl Container for FolderContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_resource(&self, kind: PackType, id: &ResourceId) -> bool {
        self.resource_path(kind, id)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    fn get_resource(&self, kind: PackType, id: &ResourceId) -> PackResult<ResourceStream> {
        let not_found = || PackError::not_found(kind.directory(), id.namespace(), id.path());
        let path = self.resource_path(kind, id).ok_or_else(not_found)?;

        match File::open(&path) {
            Ok(file) if path.is_file() => Ok(Box::new(file)),
            Ok(_) => Err(not_found()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(e.into()),
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
        if !is_valid_namespace(namespace) || !is_safe_relative(path_prefix) {
            return resources;
        }

        let base = self.namespace_dir(kind, namespace);
        let mut start = base.clone();
        start.extend(path_prefix.split('/').filter(|c| !c.is_empty()));

        let mut files = Vec::new();
        if let Err(e) = collect_files(&start, &base, &mut files) {
            if e.kind() != io::ErrorKind::NotFound {
                debug!(pack = %self.name, dir = %start.display(), error = %e, "Failed to list directory");
            }
        }

        for path in files {
            if path.ends_with(".mcmeta") {
                continue;
            }
            match ResourceId::try_new(namespace, path.as_str()) {
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
        let dir = self.root.join(kind.directory());

        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => return namespaces,
        };

        for entry in entries.flatten() {
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if is_valid_namespace(&name) {
                namespaces.insert(name);
            } else {
                warn!(pack = %self.name, namespace = %name, "Ignoring invalid namespace directory");
            }
        }

        namespaces
    }

    fn root_resource(&self, file_name: &str) -> PackResult<Option<ResourceStream>> {
        if !is_safe_relative(file_name) {
            return Ok(None);
        }
        let path = self.root.join(file_name);
        if !path.is_file() {
            return Ok(None);
        }
        match File::open(&path) {
            Ok(file) => Ok(Some(Box::new(file))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn metadata_value(&self, section: &str) -> PackResult<Option<Value>> {
        match self.read_metadata()? {
            Some(mut sections) => Ok(sections.remove(section)),
            None if section == "pack" => PackMetadataSection::synthesized(&self.name, self.kind)
                .to_value()
                .map(Some),
            None => Ok(None),
        }
    }

    fn close(&self) -> PackResult<()> {
        Ok(())
    }
}

/// Recursively collect files under `dir` as `/`-joined paths relative to `base`.
fn collect_files(dir: &Path, base: &Path, out: &mut Vec<String>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, base, out)?;
        } else if let Some(relative) = relative_resource_path(&path, base) {
            out.push(relative);
        }
    }
    Ok(())
}

fn relative_resource_path(path: &Path, base: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::testing::read_string;
    use crate::container::ContainerExt;
    use crate::metadata::PackMetadataReader;
    use tempfile::TempDir;

    const KIND: PackType = PackType::ClientResources;

    fn write(root: &Path, relative: &str, data: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, data).unwrap();
    }

    fn create_pack(temp: &TempDir) -> FolderContainer {
        let root = temp.path().join("my_pack");
        write(&root, "assets/ns/foo.txt", "foo");
        write(&root, "assets/ns/textures/block/stone.png", "stone");
        write(&root, "assets/ns/textures/block/stone.png.mcmeta", "{}");
        write(&root, "assets/ns/textures/item/Bad Name.png", "bad");
        write(&root, "assets/other/bar.txt", "bar");
        write(&root, "assets/Invalid/x.txt", "x");
        write(&root, "data/ns/recipe.json", "{}");
        write(&root, "pack.png", "icon");
        FolderContainer::new(KIND, root)
    }

    #[test]
    fn test_name_from_folder() {
        let temp = TempDir::new().unwrap();
        let pack = create_pack(&temp);
        assert_eq!(pack.name(), "my_pack");
        assert_eq!(pack.root(), temp.path().join("my_pack"));
    }

    #[test]
    fn test_namespaces_per_kind() {
        let temp = TempDir::new().unwrap();
        let pack = create_pack(&temp);

        let mut assets: Vec<_> = pack.namespaces(KIND).into_iter().collect();
        assets.sort();
        assert_eq!(assets, vec!["ns", "other"]);

        let data: Vec<_> = pack.namespaces(PackType::ServerData).into_iter().collect();
        assert_eq!(data, vec!["ns"]);
    }

    #[test]
    fn test_get_resource() {
        let temp = TempDir::new().unwrap();
        let pack = create_pack(&temp);
        let id = ResourceId::new("ns", "textures/block/stone.png");

        assert!(pack.has_resource(KIND, &id));
        assert_eq!(read_string(pack.get_resource(KIND, &id).unwrap()), "stone");
        assert!(!pack.has_resource(PackType::ServerData, &id));
    }

    #[test]
    fn test_missing_resource() {
        let temp = TempDir::new().unwrap();
        let pack = create_pack(&temp);
        let id = ResourceId::new("ns", "missing.txt");

        assert!(!pack.has_resource(KIND, &id));
        let err = pack.get_resource(KIND, &id).err().unwrap();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_directory_is_not_a_resource() {
        let temp = TempDir::new().unwrap();
        let pack = create_pack(&temp);
        let id = ResourceId::new("ns", "textures");

        assert!(!pack.has_resource(KIND, &id));
        assert!(pack.get_resource(KIND, &id).err().unwrap().is_not_found());
    }

    #[test]
    fn test_path_escape_is_absent() {
        let temp = TempDir::new().unwrap();
        let pack = create_pack(&temp);
        write(temp.path(), "secret.txt", "secret");
        let id = ResourceId::new("ns", "../../../secret.txt");

        assert!(!pack.has_resource(KIND, &id));
        assert!(pack.get_resource(KIND, &id).is_err());
        assert!(pack.root_resource("../secret.txt").unwrap().is_none());
    }

    #[test]
    fn test_list_resources() {
        let temp = TempDir::new().unwrap();
        let pack = create_pack(&temp);

        let all = pack.list_resources(KIND, "ns", "", &|_| true);
        assert_eq!(all.len(), 2, "mcmeta sidecars and invalid names are skipped");
        assert!(all.contains(&ResourceId::new("ns", "foo.txt")));
        assert!(all.contains(&ResourceId::new("ns", "textures/block/stone.png")));

        let textures = pack.list_resources(KIND, "ns", "textures", &|_| true);
        assert_eq!(textures.len(), 1);

        let filtered = pack.list_resources(KIND, "ns", "", &|id| id.path().ends_with(".txt"));
        assert_eq!(filtered.len(), 1);

        assert!(pack.list_resources(KIND, "missing", "", &|_| true).is_empty());
        assert!(pack.list_resources(KIND, "ns", "nothing/here", &|_| true).is_empty());
    }

    #[test]
    fn test_root_resource() {
        let temp = TempDir::new().unwrap();
        let pack = create_pack(&temp);

        let icon = pack.root_resource("pack.png").unwrap().unwrap();
        assert_eq!(read_string(icon), "icon");
        assert!(pack.root_resource("missing.png").unwrap().is_none());
    }

    #[test]
    fn test_synthesized_metadata() {
        let temp = TempDir::new().unwrap();
        let pack = create_pack(&temp);

        let section = pack.metadata_section(&PackMetadataReader).unwrap().unwrap();
        assert_eq!(section, PackMetadataSection::synthesized("my_pack", KIND));
        assert!(pack.metadata_value("filter").unwrap().is_none());
    }

    #[test]
    fn test_metadata_from_file() {
        let temp = TempDir::new().unwrap();
        let pack = create_pack(&temp);
        write(
            pack.root(),
            PACK_METADATA_FILE,
            r#"{"pack": {"description": "Hand written", "pack_format": 8}}"#,
        );

        let section = pack.metadata_section(&PackMetadataReader).unwrap().unwrap();
        assert_eq!(section, PackMetadataSection::new("Hand written", 8));
    }

    #[test]
    fn test_malformed_metadata() {
        let temp = TempDir::new().unwrap();
        let pack = create_pack(&temp);
        write(pack.root(), PACK_METADATA_FILE, "{ nope");

        let err = pack.metadata_value("pack").unwrap_err();
        assert!(matches!(err, PackError::InvalidMetadata { .. }));
    }

    #[test]
    fn test_nonexistent_root() {
        let temp = TempDir::new().unwrap();
        let pack = FolderContainer::new(KIND, temp.path().join("gone"));

        assert!(pack.namespaces(KIND).is_empty());
        assert!(pack.list_resources(KIND, "ns", "", &|_| true).is_empty());
        assert!(pack.close().is_ok());
    }
}
