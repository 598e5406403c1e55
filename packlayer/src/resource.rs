//! Resource addressing: identifiers and resource kinds.

use std::fmt;
use std::str::FromStr;

use crate::error::{PackError, PackResult};

/// Namespace assumed when an identifier string has no `namespace:` prefix.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Kind of resources a container is queried for.
///
/// Each kind lives under its own top-level directory inside a pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackType {
    /// Client-side assets (`assets/`).
    ClientResources,

    /// Server-side data (`data/`).
    ServerData,
}

impl PackType {
    /// Top-level directory holding resources of this kind.
    pub fn directory(&self) -> &'static str {
        match self {
            PackType::ClientResources => "assets",
            PackType::ServerData => "data",
        }
    }

    /// Pack format number written into synthesized metadata.
    pub fn default_pack_format(&self) -> u32 {
        match self {
            PackType::ClientResources => 12,
            PackType::ServerData => 10,
        }
    }
}

impl fmt::Display for PackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.directory())
    }
}

/// A namespaced, path-addressed resource identifier.
///
/// Equality and hashing are structural over `(namespace, path)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId {
    namespace: String,
    path: String,
}

impl ResourceId {
    /// Create an identifier without validating its characters.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// Create an identifier, rejecting characters outside the allowed sets.
    pub fn try_new(namespace: impl Into<String>, path: impl Into<String>) -> PackResult<Self> {
        let id = Self::new(namespace, path);
        if is_valid_namespace(&id.namespace) && is_valid_path(&id.path) {
            Ok(id)
        } else {
            Err(PackError::InvalidIdentifier(id.to_string()))
        }
    }

    /// The grouping key.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The slash-delimited path within the namespace.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Logical location of this resource inside a pack of the given kind.
    pub fn qualified_path(&self, kind: PackType) -> String {
        format!("{}/{}/{}", kind.directory(), self.namespace, self.path)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ResourceId {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((namespace, path)) => {
                let namespace = if namespace.is_empty() {
                    DEFAULT_NAMESPACE
                } else {
                    namespace
                };
                Self::try_new(namespace, path)
            }
            None => Self::try_new(DEFAULT_NAMESPACE, s),
        }
    }
}

/// Check whether a string is usable as a namespace.
pub fn is_valid_namespace(namespace: &str) -> bool {
    !namespace.is_empty()
        && namespace
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-'))
}

/// Check whether a string is usable as a resource path.
pub fn is_valid_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-' | '/'))
}
