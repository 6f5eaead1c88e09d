//! Entry names and their mapping onto the vault directory.

use crate::error::{Result, VaultError};
use std::fmt;
use std::path::{Path, PathBuf};

/// Extension appended to every encrypted entry file.
pub const ENTRY_EXTENSION: &str = "gpg";

/// File holding the recipient ids, directly under the vault root.
pub const REGISTRY_FILE: &str = ".gpg_id";

/// A validated logical entry name such as `work/email`.
///
/// The name is split once into segments; every segment but the last is a
/// namespace directory, the last one is the entry itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryName {
    segments: Vec<String>,
}

impl EntryName {
    /// Parse a `/`-separated logical name.
    pub fn parse(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(VaultError::invalid_name(name, "name is empty"));
        }
        if name == REGISTRY_FILE {
            return Err(VaultError::invalid_name(
                name,
                "name is reserved for the recipient list",
            ));
        }

        let mut segments = Vec::new();
        for segment in name.split('/') {
            match segment {
                "" => return Err(VaultError::invalid_name(name, "empty path segment")),
                "." | ".." => {
                    return Err(VaultError::invalid_name(
                        name,
                        "relative path segments are not allowed",
                    ))
                }
                _ => segments.push(segment.to_string()),
            }
        }

        Ok(Self { segments })
    }

    /// Namespace segments, empty for a top-level entry.
    pub fn namespaces(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// Last segment of the name.
    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl std::str::FromStr for EntryName {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Physical layout of a vault rooted at one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultLayout {
    root: PathBuf,
}

impl VaultLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the recipient registry file.
    pub fn registry_path(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE)
    }

    /// Directory holding the entry, i.e. the root joined with its namespaces.
    pub fn namespace_dir(&self, name: &EntryName) -> PathBuf {
        name.namespaces()
            .iter()
            .fold(self.root.clone(), |dir, segment| dir.join(segment))
    }

    /// Path of the encrypted artifact for `name`. Pure, no I/O.
    pub fn resolve(&self, name: &EntryName) -> PathBuf {
        self.namespace_dir(name)
            .join(format!("{}.{}", name.leaf(), ENTRY_EXTENSION))
    }
}

/// Strip the entry extension from a physical file name.
///
/// Returns `None` for files that are not entries.
pub fn display_name(file_name: &str) -> Option<&str> {
    if file_name == REGISTRY_FILE {
        return None;
    }
    file_name
        .strip_suffix(ENTRY_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
}
