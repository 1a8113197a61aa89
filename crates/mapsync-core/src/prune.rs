//! Gitignore-style junk pruning using the ignore crate

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::Result;

/// Outcome of a pruning pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Entries deleted (or that would be deleted in a dry run)
    pub removed: Vec<PathBuf>,
}

/// Deletes entries matching junk patterns anywhere below a root
pub struct JunkPruner {
    matcher: Gitignore,
    dry_run: bool,
}

impl JunkPruner {
    /// Build a pruner from gitignore-style patterns
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GitignoreBuilder::new("");

        for pattern in patterns {
            builder
                .add_line(None, pattern)
                .with_context(|| format!("Invalid junk pattern: '{pattern}'"))?;
        }

        let matcher = builder.build().context("Failed to build junk matcher")?;

        Ok(Self {
            matcher,
            dry_run: false,
        })
    }

    /// Report matches instead of deleting them
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Check whether a root-relative path is junk
    #[must_use]
    pub fn is_junk(&self, relative: &Path, is_dir: bool) -> bool {
        self.matcher.matched(relative, is_dir).is_ignore()
    }

    /// Delete every junk entry below `root`
    ///
    /// A missing root or no matches both yield an empty report.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be walked or an entry cannot be
    /// deleted.
    pub fn prune(&self, root: &Path) -> Result<PruneReport> {
        let mut report = PruneReport::default();

        if !root.exists() {
            return Ok(report);
        }

        let mut walker = WalkDir::new(root)
            .follow_links(false)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry =
                entry.with_context(|| format!("Failed to walk directory: {}", root.display()))?;
            let path = entry.path();
            let relative = path
                .strip_prefix(root)
                .with_context(|| format!("Failed to strip prefix from {}", path.display()))?;
            let is_dir = entry.file_type().is_dir();

            if !self.is_junk(relative, is_dir) {
                continue;
            }

            if is_dir {
                walker.skip_current_dir();
            }

            if self.dry_run {
                eprintln!("[DRY RUN] Would delete: {}", path.display());
            } else if is_dir {
                fs::remove_dir_all(path)
                    .with_context(|| format!("Failed to delete directory: {}", path.display()))?;
            } else {
                fs::remove_file(path)
                    .with_context(|| format!("Failed to delete file: {}", path.display()))?;
            }

            debug!(path = %path.display(), "Pruned");
            report.removed.push(path.to_path_buf());
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn patterns(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| (*p).to_string()).collect()
    }

    #[test]
    fn test_prunes_nested_junk() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("Cave/__MACOSX/Cave")).unwrap();
        fs::write(root.join("Cave/__MACOSX/Cave/._Cave.png"), "").unwrap();
        fs::write(root.join("Cave/.DS_Store"), "").unwrap();
        fs::write(root.join("Cave/Cave.png"), "png").unwrap();

        let pruner = JunkPruner::new(&patterns(&["__MACOSX", ".DS_Store"])).unwrap();
        let report = pruner.prune(root).unwrap();

        assert_eq!(report.removed.len(), 2);
        assert!(!root.join("Cave/__MACOSX").exists());
        assert!(!root.join("Cave/.DS_Store").exists());
        assert!(root.join("Cave/Cave.png").exists());
    }

    #[test]
    fn test_prunes_gridded_variants() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("Cave/Gridded")).unwrap();
        fs::write(root.join("Cave/Gridded/Cave.png"), "").unwrap();
        fs::write(root.join("Cave/Cave_gridded.png"), "").unwrap();
        fs::write(root.join("Cave/Cave.png"), "").unwrap();

        let pruner = JunkPruner::new(&patterns(&["*ridded*"])).unwrap();
        let report = pruner.prune(root).unwrap();

        assert_eq!(report.removed.len(), 2);
        assert!(root.join("Cave/Cave.png").exists());
    }

    #[test]
    fn test_no_matches_is_fine() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("keep.png"), "").unwrap();

        let pruner = JunkPruner::new(&patterns(&[".DS_Store"])).unwrap();
        let report = pruner.prune(tmp.path()).unwrap();

        assert!(report.removed.is_empty());
    }

    #[test]
    fn test_missing_root_is_fine() {
        let tmp = TempDir::new().unwrap();
        let pruner = JunkPruner::new(&patterns(&[".DS_Store"])).unwrap();

        let report = pruner.prune(&tmp.path().join("missing")).unwrap();

        assert!(report.removed.is_empty());
    }

    #[test]
    fn test_dry_run_keeps_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".DS_Store"), "").unwrap();

        let pruner = JunkPruner::new(&patterns(&[".DS_Store"]))
            .unwrap()
            .with_dry_run(true);
        let report = pruner.prune(tmp.path()).unwrap();

        assert_eq!(report.removed.len(), 1);
        assert!(tmp.path().join(".DS_Store").exists());
    }

    #[test]
    fn test_is_junk() {
        let pruner = JunkPruner::new(&patterns(&["__MACOSX/"])).unwrap();
        assert!(pruner.is_junk(Path::new("a/__MACOSX"), true));
        assert!(!pruner.is_junk(Path::new("a/__MACOSX"), false));
    }
}
