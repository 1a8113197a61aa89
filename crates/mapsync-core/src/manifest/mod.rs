//! Manifest building and diffing
//!
//! A manifest is a JSON listing of every entry below a mirror root, sorted
//! by path. It carries no timestamps or absolute paths, so building it twice
//! over an unchanged tree produces byte-identical output and the file can be
//! diffed between builds.

mod diff;
mod hash;

use std::fs;
use std::path::{Component, Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::Layout;
use crate::error::Result;

/// Kind of a manifest entry, resolved through symbolic links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link whose target is gone
    BrokenLink,
}

/// A single listed entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// `/`-separated path relative to the manifest root
    pub path: String,
    /// Entry kind
    pub kind: EntryKind,
    /// File size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Hex SHA-256 of the file contents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// Snapshot of a directory tree
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Entries sorted by path
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Serialize as pretty JSON with a trailing newline
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self).context("Failed to serialize manifest")?;
        json.push('\n');
        Ok(json)
    }

    /// Write the manifest, skipping the write when the file is already current
    ///
    /// Returns whether the file changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    pub fn write(&self, path: &Path) -> Result<bool> {
        let json = self.to_json()?;

        if path.exists() {
            let current = fs::read_to_string(path)
                .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
            if current == json {
                debug!(path = %path.display(), "Manifest unchanged");
                return Ok(false);
            }
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, json)
            .with_context(|| format!("Failed to write manifest: {}", path.display()))?;

        Ok(true)
    }

    /// Diff the manifest stored at `path` against this one
    ///
    /// A missing file diffs as empty. Returns `None` when nothing changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored manifest cannot be read.
    pub fn diff_against_file(&self, path: &Path, color: bool) -> Result<Option<String>> {
        let current = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read manifest: {}", path.display()))?
        } else {
            String::new()
        };
        let fresh = self.to_json()?;
        let label = path.display().to_string();

        Ok(diff::render(
            &current,
            &fresh,
            &label,
            &format!("{label} (rebuilt)"),
            color,
        ))
    }
}

/// Builds manifests from directory trees
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestBuilder {
    include_hashes: bool,
}

impl ManifestBuilder {
    /// Create a builder, optionally hashing file contents
    #[must_use]
    pub const fn new(include_hashes: bool) -> Self {
        Self { include_hashes }
    }

    /// List every entry below `root`
    ///
    /// Symbolic links are reported as what they point to; linked
    /// directories are not descended.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is missing or the tree cannot be read.
    pub fn build(&self, root: &Path) -> Result<Manifest> {
        Layout::require_dir("Manifest", root)?;

        let mut entries = Vec::new();

        for entry in WalkDir::new(root).follow_links(false).min_depth(1) {
            let entry =
                entry.with_context(|| format!("Failed to walk directory: {}", root.display()))?;
            let path = entry.path();
            let rel = path
                .strip_prefix(root)
                .with_context(|| format!("Failed to strip prefix from {}", path.display()))?;

            let (kind, size) = match fs::metadata(path) {
                Ok(meta) if meta.is_dir() => (EntryKind::Directory, None),
                Ok(meta) => (EntryKind::File, Some(meta.len())),
                Err(_) if entry.path_is_symlink() => (EntryKind::BrokenLink, None),
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to read metadata: {}", path.display()));
                }
            };

            let sha256 = if self.include_hashes && kind == EntryKind::File {
                Some(hash::sha256_hex(path)?)
            } else {
                None
            };

            entries.push(ManifestEntry {
                path: slash_path(rel),
                kind,
                size,
                sha256,
            });
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(Manifest { entries })
    }
}

fn slash_path(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
