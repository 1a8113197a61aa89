//! Configuration error types

use std::path::PathBuf;

/// Errors caused by invalid configuration or a broken directory layout.
///
/// These are fatal: the run stops and nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file named on the command line does not exist
    #[error("Config file not found: {}", .0.display())]
    ConfigFileNotFound(PathBuf),

    /// Category name cannot be used as a directory name
    #[error("Invalid category name '{name}': {reason}")]
    InvalidCategoryName {
        /// Offending name
        name: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Two categories share a name
    #[error("Duplicate category '{0}'")]
    DuplicateCategory(String),

    /// Category requested on the command line is not configured
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    /// Word-removal phrase is empty
    #[error("Category '{category}' has an empty word-removal phrase at position {position}")]
    EmptyPhrase {
        /// Category owning the rule set
        category: String,
        /// 1-based position in the rule set
        position: usize,
    },

    /// Exclusion marker is empty and would exclude everything
    #[error("Category '{category}' has an empty exclude marker")]
    EmptyMarker {
        /// Category owning the marker
        category: String,
    },

    /// Glob or gitignore-style pattern is empty
    #[error("{kind} pattern cannot be empty")]
    EmptyPattern {
        /// Which pattern list contained it
        kind: &'static str,
    },

    /// Download delay of zero would click every link at once
    #[error("Download delay must be greater than zero")]
    ZeroDelay,

    /// Required directory is missing
    #[error("{role} directory does not exist: {}", path.display())]
    MissingRoot {
        /// What the directory is used for
        role: &'static str,
        /// Expected location
        path: PathBuf,
    },

    /// Mirror and source roots overlap
    #[error(
        "Mirror root {} and source root {} must not contain each other",
        mirror_root.display(),
        source_root.display()
    )]
    NestedRoots {
        /// Source root
        source_root: PathBuf,
        /// Mirror root
        mirror_root: PathBuf,
    },
}
