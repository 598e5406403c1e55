//! Pack discovery in the global resources folder.
//!
//! This module turns the entries of a folder into leaf containers and wraps
//! them into the global pack.
//!
//! # Layout
//!
//! ```text
//! ~/.packlayer/globalresources/
//! ├── a_textures/        # Folder pack (lowest priority)
//! ├── b_overrides.zip    # Zip pack
//! ├── notes.txt          # Ignored
//! └── z_fixes/           # Folder pack (highest priority)
//! ```
//!
//! Entries are sorted by file name; later names win on collision.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::PackSettings;
use crate::container::{
    Container, ContainerRef, EmptyContainer, FolderContainer, WrappedGroupContainer, ZipContainer,
};
use crate::error::PackResult;
use crate::metadata::PackMetadataSection;
use crate::resource::PackType;

/// Display name of the global pack's base placeholder.
pub const GLOBAL_DISPLAY_NAME: &str = "Global Resources";

/// Kind of pack found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackSource {
    /// A plain directory.
    Folder,

    /// A `.zip` archive.
    Zip,
}

/// Discovers packs in a directory.
#[derive(Debug, Clone)]
pub struct PackDiscovery {
    /// Folder scanned for packs.
    dir: PathBuf,
}

impl PackDiscovery {
    /// Create a new discovery for the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the scanned directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if it does not exist yet.
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        if !self.dir.is_dir() {
            std::fs::create_dir_all(&self.dir)?;
            info!(dir = %self.dir.display(), "Created global resources folder");
        }
        Ok(())
    }

    /// Classify a directory entry, or `None` if it is not a pack.
    pub fn classify(path: &Path) -> Option<PackSource> {
        let name = path.file_name()?.to_string_lossy();
        if name.starts_with('.') {
            return None;
        }
        if path.is_dir() {
            Some(PackSource::Folder)
        } else if path.is_file() && name.to_lowercase().ends_with(".zip") {
            Some(PackSource::Zip)
        } else {
            None
        }
    }

    /// Find pack entries, sorted by file name (priority order).
    pub fn find_packs(&self) -> std::io::Result<Vec<(PathBuf, PackSource)>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut packs = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if let Some(source) = Self::classify(&path) {
                packs.push((path, source));
            }
        }

        packs.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
        Ok(packs)
    }

    /// Open every discovered pack as a container, lowest priority first.
    ///
    /// Archives that cannot be opened are logged and skipped.
    pub fn discover(&self, kind: PackType) -> PackResult<Vec<ContainerRef>> {
        let mut containers: Vec<ContainerRef> = Vec::new();

        for (path, source) in self.find_packs()? {
            match source {
                PackSource::Folder => containers.push(Arc::new(FolderContainer::new(kind, path))),
                PackSource::Zip => match ZipContainer::open(kind, &path) {
                    Ok(zip) => containers.push(Arc::new(zip)),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Skipping unreadable archive");
                    }
                },
            }
        }

        info!(
            dir = %self.dir.display(),
            kind = %kind,
            packs = containers.len(),
            "Discovered packs"
        );
        Ok(containers)
    }

    /// Build the global pack: discovered packs wrapped around a placeholder base.
    ///
    /// A failure to scan the folder is logged and yields a pack holding only
    /// the base.
    pub fn build_global_pack(
        &self,
        kind: PackType,
        settings: &PackSettings,
    ) -> WrappedGroupContainer {
        let base: ContainerRef = Arc::new(global_base(kind, &settings.pack_id));

        let members = match self.ensure_dir() {
            Ok(()) => self.discover(kind),
            Err(e) => Err(e.into()),
        }
        .unwrap_or_else(|e| {
            warn!(dir = %self.dir.display(), error = %e, "Failed to scan global resources folder");
            Vec::new()
        });

        let pack = WrappedGroupContainer::new(kind, base, members, settings.base_priority);
        info!(pack = %pack.full_name(), "Built global pack");
        pack
    }
}

/// Placeholder base of the global pack.
pub fn global_base(kind: PackType, pack_id: &str) -> EmptyContainer {
    EmptyContainer::new(
        format!("{}_global", pack_id),
        GLOBAL_DISPLAY_NAME,
        PackMetadataSection::new(GLOBAL_DISPLAY_NAME, kind.default_pack_format()),
    )
}

/// Names of the leaves of a global pack, base excluded.
pub fn leaf_names(pack: &WrappedGroupContainer) -> Vec<String> {
    pack.stream_leaves()
        .filter(|leaf| !Arc::ptr_eq(leaf, pack.base()))
        .map(|leaf| leaf.name().to_string())
        .collect()
}
