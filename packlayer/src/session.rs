//! Pack session lifecycle.
//!
//! A session owns the active global pack. Each reload builds a fresh
//! aggregate, swaps it in and closes the one it replaces; aggregates are
//! never mutated in place.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::PackSettings;
use crate::container::{Container, WrappedGroupContainer};
use crate::discovery::PackDiscovery;
use crate::error::PackResult;
use crate::resource::PackType;

/// Owner of the active global pack for one resource kind.
pub struct PackSession {
    kind: PackType,
    settings: PackSettings,
    current: Option<Arc<WrappedGroupContainer>>,
    generation: u64,
}

impl PackSession {
    /// Create a session with no active pack.
    pub fn new(kind: PackType, settings: PackSettings) -> Self {
        Self {
            kind,
            settings,
            current: None,
            generation: 0,
        }
    }

    /// Resource kind served by this session.
    pub fn kind(&self) -> PackType {
        self.kind
    }

    /// Number of reloads performed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The active pack, if any.
    pub fn current(&self) -> Option<Arc<WrappedGroupContainer>> {
        self.current.clone()
    }

    /// Build a fresh global pack and replace the active one.
    ///
    /// The replaced pack is closed; close failures are logged, since the new
    /// pack is already in place.
    pub fn reload(&mut self) -> Arc<WrappedGroupContainer> {
        let discovery = PackDiscovery::new(&self.settings.global_dir);
        let pack = Arc::new(discovery.build_global_pack(self.kind, &self.settings));

        if let Some(previous) = self.current.replace(Arc::clone(&pack)) {
            if let Err(e) = previous.close() {
                warn!(pack = previous.name(), error = %e, "Failed to close replaced pack");
            }
        }

        self.generation += 1;
        info!(
            kind = %self.kind,
            generation = self.generation,
            members = pack.members().len(),
            "Reloaded pack session"
        );
        pack
    }

    /// Close and drop the active pack.
    pub fn close(&mut self) -> PackResult<()> {
        match self.current.take() {
            Some(pack) => pack.close(),
            None => Ok(()),
        }
    }
}

impl Drop for PackSession {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(kind = %self.kind, error = %e, "Failed to close pack session");
        }
    }
}
