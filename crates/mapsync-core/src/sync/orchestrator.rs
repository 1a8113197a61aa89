//! Sync orchestration - plans and applies mirror changes

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};
use walkdir::WalkDir;

use super::SyncResult;
use super::actions::LinkAction;
use super::executor::LinkExecutor;
use crate::config::{ConfigError, Layout};
use crate::error::Result;
use crate::normalize::PathRenamer;

/// Everything a sync run would do, computed without touching the mirror
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    /// Actions in execution order
    pub actions: Vec<LinkAction>,
    /// Source entries rejected by the renamer
    pub excluded: usize,
    /// Source entries that lost a destination path to another entry
    pub collisions: usize,
    /// Non-fatal problems found while planning
    pub warnings: Vec<String>,
}

impl SyncPlan {
    /// Number of actions that would modify the mirror
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.actions.iter().filter(|a| a.is_change()).count()
    }
}

/// Desired link with the source it came from
struct DesiredLink {
    target: PathBuf,
    source: String,
}

/// Mirrors a source tree into a tree of symbolic links
pub struct SymlinkSyncEngine<R> {
    renamer: R,
    dry_run: bool,
}

impl<R: PathRenamer> SymlinkSyncEngine<R> {
    /// Create a new sync engine using `renamer` for destination names
    #[must_use]
    pub const fn new(renamer: R) -> Self {
        Self {
            renamer,
            dry_run: false,
        }
    }

    /// Report actions instead of executing them
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reconcile `dest_root` with `source_root`
    ///
    /// Every action is independent: a failure is recorded in the result and
    /// the run continues with the next action.
    ///
    /// # Errors
    ///
    /// Returns an error if the source root is missing, the roots overlap, or
    /// either tree cannot be walked.
    pub fn sync(&self, source_root: &Path, dest_root: &Path) -> Result<SyncResult> {
        let plan = self.plan(source_root, dest_root)?;

        if !self.dry_run {
            fs::create_dir_all(dest_root).with_context(|| {
                format!("Failed to create mirror root: {}", dest_root.display())
            })?;
        }

        let mut result = SyncResult {
            excluded: plan.excluded,
            collisions: plan.collisions,
            warnings: plan.warnings,
            ..SyncResult::default()
        };

        let executor = LinkExecutor::new(dest_root, self.dry_run);
        for action in &plan.actions {
            if let Err(e) = executor.execute(action, &mut result) {
                warn!(link = %action.link().display(), "{e:#}");
                result.errors.push(format!("{e:#}"));
            }
        }

        info!(
            created = result.created,
            replaced = result.replaced,
            removed = result.removed,
            unchanged = result.unchanged,
            "Synchronized {}",
            dest_root.display()
        );

        Ok(result)
    }

    /// Compute the actions needed to bring `dest_root` in line with `source_root`
    ///
    /// # Errors
    ///
    /// Returns an error if the source root is missing, the roots overlap, or
    /// either tree cannot be walked.
    pub fn plan(&self, source_root: &Path, dest_root: &Path) -> Result<SyncPlan> {
        Layout::require_dir("Source", source_root)?;

        let source_root = dunce::canonicalize(source_root)
            .with_context(|| format!("Failed to resolve {}", source_root.display()))?;
        Self::check_roots_disjoint(&source_root, dest_root)?;

        let mut plan = SyncPlan::default();
        let mut desired = self.collect_desired(&source_root, &mut plan)?;
        Self::drop_shadowed_links(&mut desired, &mut plan);

        let mut seen = BTreeSet::new();
        if dest_root.exists() {
            Self::reconcile_existing(dest_root, &desired, &mut seen, &mut plan)?;
        }

        for (rel, link) in &desired {
            if !seen.contains(rel) {
                plan.actions.push(LinkAction::Create {
                    link: dest_root.join(rel),
                    target: link.target.clone(),
                });
            }
        }

        plan.actions.sort_by_key(LinkAction::order);
        Ok(plan)
    }

    /// Walk the source tree and map every retained leaf to its mirror path
    fn collect_desired(
        &self,
        source_root: &Path,
        plan: &mut SyncPlan,
    ) -> Result<BTreeMap<PathBuf, DesiredLink>> {
        let mut desired: BTreeMap<PathBuf, DesiredLink> = BTreeMap::new();

        let mut walker = WalkDir::new(source_root)
            .follow_links(false)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry.with_context(|| {
                format!("Failed to walk source tree: {}", source_root.display())
            })?;
            let rel = relative_string(entry.path(), source_root)?;

            if entry.file_type().is_dir() {
                if self.renamer.rename(&rel).is_none() {
                    plan.excluded += 1;
                    walker.skip_current_dir();
                }
                continue;
            }

            let Some(renamed) = self.renamer.rename(&rel) else {
                plan.excluded += 1;
                continue;
            };

            let dest_rel = to_relative_path(&renamed);
            if dest_rel.as_os_str().is_empty() {
                let message = format!("'{rel}' normalizes to an empty name; skipped");
                warn!("{message}");
                plan.warnings.push(message);
                continue;
            }

            let link = DesiredLink {
                target: entry.path().to_path_buf(),
                source: rel.clone(),
            };
            if let Some(previous) = desired.insert(dest_rel, link) {
                // Enumeration is sorted, so the later entry wins deterministically
                let message = format!(
                    "Collision: '{}' and '{rel}' both map to '{renamed}'; keeping '{rel}'",
                    previous.source
                );
                warn!("{message}");
                plan.warnings.push(message);
                plan.collisions += 1;
            }
        }

        Ok(desired)
    }

    /// Drop links whose path is also needed as a directory for other links
    fn drop_shadowed_links(desired: &mut BTreeMap<PathBuf, DesiredLink>, plan: &mut SyncPlan) {
        let directories: BTreeSet<PathBuf> = desired
            .keys()
            .flat_map(|rel| rel.ancestors().skip(1))
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .collect();

        for dir in directories {
            if let Some(shadowed) = desired.remove(&dir) {
                let message = format!(
                    "Collision: '{}' maps to '{}', which is also a directory; skipped",
                    shadowed.source,
                    dir.display()
                );
                warn!("{message}");
                plan.warnings.push(message);
                plan.collisions += 1;
            }
        }
    }

    /// Compare what is already in the mirror against the desired links
    fn reconcile_existing(
        dest_root: &Path,
        desired: &BTreeMap<PathBuf, DesiredLink>,
        seen: &mut BTreeSet<PathBuf>,
        plan: &mut SyncPlan,
    ) -> Result<()> {
        for entry in WalkDir::new(dest_root)
            .follow_links(false)
            .min_depth(1)
            .sort_by_file_name()
        {
            let entry = entry
                .with_context(|| format!("Failed to walk mirror: {}", dest_root.display()))?;
            let path = entry.path();
            let rel = path
                .strip_prefix(dest_root)
                .with_context(|| format!("Failed to strip prefix from {}", path.display()))?
                .to_path_buf();
            let wanted = desired.get(&rel);

            if entry.path_is_symlink() {
                let current = fs::read_link(path)
                    .with_context(|| format!("Failed to read link: {}", path.display()))?;

                let action = match wanted {
                    None => LinkAction::Remove {
                        link: path.to_path_buf(),
                    },
                    Some(link) if link.target == current => LinkAction::Keep {
                        link: path.to_path_buf(),
                    },
                    Some(link) => LinkAction::Replace {
                        link: path.to_path_buf(),
                        target: link.target.clone(),
                        previous: current,
                    },
                };
                if wanted.is_some() {
                    seen.insert(rel);
                }
                plan.actions.push(action);
            } else if let Some(link) = wanted {
                let is_dir = entry.file_type().is_dir();
                let action = if is_dir && holds_only_links(path) {
                    // Mirror directory left over from an earlier layout; its
                    // links are stale and removed before creation runs
                    LinkAction::Create {
                        link: path.to_path_buf(),
                        target: link.target.clone(),
                    }
                } else {
                    let kind = if is_dir { "a directory" } else { "a regular file" };
                    LinkAction::Blocked {
                        link: path.to_path_buf(),
                        reason: format!("{kind} is in the way"),
                    }
                };
                plan.actions.push(action);
                seen.insert(rel);
            }
        }

        Ok(())
    }

    /// Refuse to mirror a tree into itself
    fn check_roots_disjoint(source_root: &Path, dest_root: &Path) -> Result<()> {
        let Ok(dest) = dunce::canonicalize(dest_root) else {
            // Not created yet; only a lexical check is possible
            let dest = std::path::absolute(dest_root)
                .with_context(|| format!("Failed to resolve {}", dest_root.display()))?;
            return Self::ensure_disjoint(source_root, &dest);
        };
        Self::ensure_disjoint(source_root, &dest)
    }

    fn ensure_disjoint(source_root: &Path, dest: &Path) -> Result<()> {
        if dest.starts_with(source_root) || source_root.starts_with(dest) {
            return Err(ConfigError::NestedRoots {
                source_root: source_root.to_path_buf(),
                mirror_root: dest.to_path_buf(),
            }
            .into());
        }
        Ok(())
    }
}

/// Whether `dir` contains nothing but directories and symbolic links
fn holds_only_links(dir: &Path) -> bool {
    WalkDir::new(dir)
        .follow_links(false)
        .min_depth(1)
        .into_iter()
        .all(|entry| {
            entry.is_ok_and(|e| e.file_type().is_dir() || e.path_is_symlink())
        })
}

/// Render a path below `root` with `/` separators
fn relative_string(path: &Path, root: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .with_context(|| format!("Failed to strip prefix from {}", path.display()))?;

    Ok(rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/"))
}

/// Turn a `/`-separated name into a relative path, dropping empty segments
fn to_relative_path(name: &str) -> PathBuf {
    name.split('/')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .collect()
}
