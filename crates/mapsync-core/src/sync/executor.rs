//! Filesystem operations for link actions

use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;
use tracing::debug;
use walkdir::WalkDir;

use super::SyncResult;
use super::actions::LinkAction;
use crate::error::Result;

/// Executes link actions against the mirror
pub struct LinkExecutor<'a> {
    dest_root: &'a Path,
    dry_run: bool,
}

impl<'a> LinkExecutor<'a> {
    /// Create a new executor for the mirror at `dest_root`
    #[must_use]
    pub const fn new(dest_root: &'a Path, dry_run: bool) -> Self {
        Self { dest_root, dry_run }
    }

    /// Execute a link action
    ///
    /// # Errors
    ///
    /// Returns an error if file operations fail or the action is blocked.
    pub fn execute(&self, action: &LinkAction, result: &mut SyncResult) -> Result<()> {
        match action {
            LinkAction::Create { link, target } => {
                if self.dry_run {
                    eprintln!(
                        "[DRY RUN] Would link: {} -> {}",
                        link.display(),
                        target.display()
                    );
                } else {
                    Self::create_link(target, link)?;
                }
                result.created += 1;
            }
            LinkAction::Replace {
                link,
                target,
                previous,
            } => {
                if self.dry_run {
                    eprintln!(
                        "[DRY RUN] Would relink: {} -> {} (was {})",
                        link.display(),
                        target.display(),
                        previous.display()
                    );
                } else {
                    Self::remove_link(link)?;
                    Self::create_link(target, link)?;
                }
                result.replaced += 1;
            }
            LinkAction::Remove { link } => {
                if self.dry_run {
                    eprintln!("[DRY RUN] Would remove: {}", link.display());
                } else {
                    Self::remove_link(link)?;
                    self.prune_empty_parents(link)?;
                }
                result.removed += 1;
            }
            LinkAction::Keep { .. } => {
                result.unchanged += 1;
            }
            LinkAction::Blocked { link, reason } => {
                anyhow::bail!("Cannot link {}: {reason}", link.display());
            }
        }
        Ok(())
    }

    /// Create a symlink, creating parent directories as needed
    fn create_link(target: &Path, link: &Path) -> Result<()> {
        if fs::symlink_metadata(link).is_ok_and(|m| m.is_dir()) {
            Self::remove_vacated_dir(link)?;
        }

        if let Some(parent) = link.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        symlink(target, link).with_context(|| {
            format!(
                "Failed to create link {} -> {}",
                link.display(),
                target.display()
            )
        })?;

        debug!(link = %link.display(), target = %target.display(), "Created link");
        Ok(())
    }

    /// Remove a mirror directory whose links are all gone
    ///
    /// Only empty directories are removed, so anything else left inside
    /// makes this fail.
    fn remove_vacated_dir(dir: &Path) -> Result<()> {
        for entry in WalkDir::new(dir).contents_first(true) {
            let entry =
                entry.with_context(|| format!("Failed to walk directory: {}", dir.display()))?;
            fs::remove_dir(entry.path()).with_context(|| {
                format!("Failed to remove directory: {}", entry.path().display())
            })?;
        }
        debug!(dir = %dir.display(), "Removed vacated directory");
        Ok(())
    }

    fn remove_link(link: &Path) -> Result<()> {
        remove_symlink(link)
            .with_context(|| format!("Failed to remove link: {}", link.display()))?;
        debug!(link = %link.display(), "Removed link");
        Ok(())
    }

    /// Remove directories emptied by a link removal, stopping at the mirror root
    fn prune_empty_parents(&self, link: &Path) -> Result<()> {
        let mut current = link.parent();

        while let Some(dir) = current {
            if dir == self.dest_root || !dir.starts_with(self.dest_root) {
                break;
            }

            let is_empty = fs::read_dir(dir)
                .with_context(|| format!("Failed to read directory: {}", dir.display()))?
                .next()
                .is_none();
            if !is_empty {
                break;
            }

            fs::remove_dir(dir)
                .with_context(|| format!("Failed to remove directory: {}", dir.display()))?;
            debug!(dir = %dir.display(), "Removed empty directory");

            current = dir.parent();
        }

        Ok(())
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(unix)]
fn remove_symlink(link: &Path) -> io::Result<()> {
    fs::remove_file(link)
}

#[cfg(windows)]
fn remove_symlink(link: &Path) -> io::Result<()> {
    // Directory symlinks are directories as far as Windows is concerned
    match fs::remove_file(link) {
        Err(_) if fs::symlink_metadata(link).is_ok_and(|m| m.is_dir()) => fs::remove_dir(link),
        other => other,
    }
}
