//! Link actions produced by planning

use std::path::{Path, PathBuf};

/// A single change to the mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Create a new link
    Create {
        /// Link location in the mirror
        link: PathBuf,
        /// Absolute source entry
        target: PathBuf,
    },
    /// Point an existing link at a different source entry
    Replace {
        /// Link location in the mirror
        link: PathBuf,
        /// New absolute source entry
        target: PathBuf,
        /// Target the link had before
        previous: PathBuf,
    },
    /// Delete a stale link
    Remove {
        /// Link location in the mirror
        link: PathBuf,
    },
    /// Link is already correct
    Keep {
        /// Link location in the mirror
        link: PathBuf,
    },
    /// A desired link path is occupied by something the synchronizer did not create
    Blocked {
        /// Desired link location
        link: PathBuf,
        /// What is in the way
        reason: String,
    },
}

impl LinkAction {
    /// Mirror path this action concerns
    #[must_use]
    pub fn link(&self) -> &Path {
        match self {
            Self::Create { link, .. }
            | Self::Replace { link, .. }
            | Self::Remove { link }
            | Self::Keep { link }
            | Self::Blocked { link, .. } => link,
        }
    }

    /// Whether executing this action modifies the filesystem
    #[must_use]
    pub const fn is_change(&self) -> bool {
        matches!(
            self,
            Self::Create { .. } | Self::Replace { .. } | Self::Remove { .. }
        )
    }

    /// Execution order: removals first so freed paths can be reused
    pub(super) const fn order(&self) -> u8 {
        match self {
            Self::Remove { .. } => 0,
            Self::Replace { .. } => 1,
            Self::Create { .. } => 2,
            Self::Keep { .. } | Self::Blocked { .. } => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_change() {
        let link = PathBuf::from("a");
        assert!(LinkAction::Remove { link: link.clone() }.is_change());
        assert!(!LinkAction::Keep { link: link.clone() }.is_change());
        assert!(
            !LinkAction::Blocked {
                link,
                reason: "file".to_string()
            }
            .is_change()
        );
    }

    #[test]
    fn test_removals_ordered_first() {
        let remove = LinkAction::Remove {
            link: PathBuf::from("a"),
        };
        let create = LinkAction::Create {
            link: PathBuf::from("a/b"),
            target: PathBuf::from("/src/b"),
        };
        assert!(remove.order() < create.order());
    }
}
