//! PackLayer - Layered resource pack overlays
//!
//! This library aggregates an ordered collection of resource containers
//! (folders, zip archives, placeholders, or other aggregates) into a single
//! virtual container with priority-based conflict resolution.
//!
//! # Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          WrappedGroupContainer               │
//! │                                              │
//! │  base: EmptyContainer ("Global Resources")   │
//! │  members: [base, a_folder, b.zip, c_folder]  │
//! │           lowest ──────────────► highest     │
//! └────────────────┬─────────────────────────────┘
//!                  │ namespace index (built once)
//!                  ▼
//!   "minecraft" ─► [a_folder, c_folder]
//!   "mymod"     ─► [b.zip]
//! ```
//!
//! Fetching a resource picks the highest-priority member that has it;
//! listing resources returns the union across every member.

pub mod config;
pub mod container;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod resource;
pub mod session;

pub use container::{
    Container, ContainerExt, ContainerRef, EmptyContainer, FolderContainer, GroupContainer,
    ResourceStream, WrappedGroupContainer, ZipContainer,
};
pub use error::{CloseFailure, PackError, PackResult};
pub use resource::{PackType, ResourceId};

/// Crate version, used in logs and the CLI banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
