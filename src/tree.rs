//! Depth-first listing of namespaces and entries.

use crate::error::{Result, VaultError};
use crate::models::display_name;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Kind of a listed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Namespace,
    Entry,
}

/// One line of the vault listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeLine {
    pub kind: LineKind,
    /// Directory name or entry name without extension.
    pub name: String,
    /// Logical path from the vault root, e.g. `site/login`.
    pub path: String,
    /// Path separators between the vault root and this line's level. A
    /// namespace counts its own directory; an entry sits one level below the
    /// directory holding it, so top-level entries are at depth 1.
    pub depth: usize,
}

impl TreeLine {
    /// Leading spaces: `2 * depth`, with first-level namespace headers flush left.
    pub fn indentation(&self) -> usize {
        match self.kind {
            LineKind::Namespace if self.depth == 1 => 0,
            _ => 2 * self.depth,
        }
    }
}

impl fmt::Display for TreeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = " ".repeat(self.indentation());
        match self.kind {
            LineKind::Namespace => write!(f, "{indent}[{}]", self.name),
            LineKind::Entry => write!(f, "{indent}{}", self.name),
        }
    }
}

/// Files before directories, then by file name.
fn listing_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Lazy walk over a vault directory.
pub struct VaultTree {
    root: PathBuf,
    walker: walkdir::IntoIter,
}

impl VaultTree {
    pub fn new(root: &Path) -> Self {
        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by(listing_order)
            .into_iter();
        Self {
            root: root.to_path_buf(),
            walker,
        }
    }

    fn logical_path(&self, path: &Path, leaf: &str) -> String {
        let mut segments: Vec<String> = path
            .parent()
            .and_then(|parent| parent.strip_prefix(&self.root).ok())
            .map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        segments.push(leaf.to_string());
        segments.join("/")
    }

    fn line_for(&self, entry: &DirEntry) -> Option<TreeLine> {
        let file_name = entry.file_name().to_string_lossy();
        let depth = entry.depth();

        if entry.file_type().is_dir() {
            return Some(TreeLine {
                kind: LineKind::Namespace,
                name: file_name.to_string(),
                path: self.logical_path(entry.path(), &file_name),
                depth,
            });
        }

        if !entry.file_type().is_file() {
            return None;
        }

        display_name(&file_name).map(|name| TreeLine {
            kind: LineKind::Entry,
            name: name.to_string(),
            path: self.logical_path(entry.path(), name),
            depth,
        })
    }
}

impl Iterator for VaultTree {
    type Item = Result<TreeLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(VaultError::Io(e.into()))),
            };
            if let Some(line) = self.line_for(&entry) {
                return Some(Ok(line));
            }
        }
    }
}
