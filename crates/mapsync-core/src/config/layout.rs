//! Fixed directory layout for a category

use std::path::{Path, PathBuf};

use super::error::ConfigError;

/// Directory convention shared by every category
///
/// ```text
/// <base>/raw/<name>-zipped      downloaded archives
/// <base>/raw/<name>-unzipped    extraction working root
/// <base>/<name>                 symlink mirror
/// <base>/<name>-manifest.json   manifest of the mirror
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    base_dir: PathBuf,
    name: String,
}

impl Layout {
    /// Layout for the category `name` under `base_dir`
    #[must_use]
    pub fn new(base_dir: &Path, name: &str) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            name: name.to_string(),
        }
    }

    /// Root shared by all categories' raw data
    #[must_use]
    pub fn raw_root(&self) -> PathBuf {
        self.base_dir.join("raw")
    }

    /// Downloaded archives
    #[must_use]
    pub fn zipped(&self) -> PathBuf {
        self.raw_root().join(format!("{}-zipped", self.name))
    }

    /// Extracted archives, the synchronizer's source
    #[must_use]
    pub fn unzipped(&self) -> PathBuf {
        self.raw_root().join(format!("{}-unzipped", self.name))
    }

    /// Symlink mirror, the synchronizer's destination
    #[must_use]
    pub fn mirror(&self) -> PathBuf {
        self.base_dir.join(&self.name)
    }

    /// Manifest artifact
    #[must_use]
    pub fn manifest(&self) -> PathBuf {
        self.base_dir.join(format!("{}-manifest.json", self.name))
    }

    /// Fail unless `path` is an existing directory
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRoot`] when the directory is absent.
    pub fn require_dir(role: &'static str, path: &Path) -> Result<(), ConfigError> {
        if path.is_dir() {
            Ok(())
        } else {
            Err(ConfigError::MissingRoot {
                role,
                path: path.to_path_buf(),
            })
        }
    }
}
