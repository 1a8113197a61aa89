//! Symbolic link tree synchronization
//!
//! Mirrors an extracted asset tree into a directory of symbolic links whose
//! names come from a [`PathRenamer`](crate::normalize::PathRenamer). Files
//! become links to their absolute source path, directories become real
//! directories. Links that no longer match a live, retained source entry are
//! removed; anything in the mirror that is not a symbolic link is left alone.

mod actions;
mod executor;
mod orchestrator;
mod reporting;

pub use actions::LinkAction;
pub use orchestrator::{SymlinkSyncEngine, SyncPlan};
pub use reporting::SyncReporter;

/// Synchronization result with statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncResult {
    /// Links created
    pub created: usize,
    /// Links re-pointed at a different source entry
    pub replaced: usize,
    /// Stale links removed
    pub removed: usize,
    /// Links already correct
    pub unchanged: usize,
    /// Source entries excluded by the renamer
    pub excluded: usize,
    /// Source entries that lost their destination path to another entry
    pub collisions: usize,
    /// Non-fatal problems, such as collisions
    pub warnings: Vec<String>,
    /// Per-entry failures
    pub errors: Vec<String>,
}

impl SyncResult {
    /// Total operations performed
    #[must_use]
    pub const fn total_operations(&self) -> usize {
        self.created + self.replaced + self.removed
    }

    /// Whether sync was successful (no errors)
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
