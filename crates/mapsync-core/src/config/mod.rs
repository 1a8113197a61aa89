//! Configuration file parsing, merging, validation and directory layout
//!
//! This module handles:
//! - Config file discovery from multiple locations
//! - TOML parsing with serde
//! - Config merging with precedence rules
//! - Validation with typed errors
//! - The per-category directory layout

mod discovery;
mod error;
mod layout;
mod merge;
mod types;
mod validation;

pub use discovery::{ConfigDiscovery, ConfigFiles};
pub use error::ConfigError;
pub use layout::Layout;
pub use merge::ConfigMerger;
pub use types::{
    CategoryConfig, Config, DEFAULT_CATEGORY, DEFAULT_DOWNLOAD_DELAY_MS, DEFAULT_JUNK_PATTERNS,
    NormalizeConfig,
};
pub use validation::ConfigValidator;

use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Configuration manager that coordinates discovery, parsing, merging, and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load and merge configuration from all sources
    ///
    /// With `no_config` set every file is ignored and the defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly requested file is missing, or if
    /// config files are invalid or cannot be read.
    pub fn load(cli_config_path: Option<&Path>, no_config: bool) -> Result<Config> {
        if no_config {
            debug!("Ignoring all config files");
            return Ok(Config::default());
        }

        let files = ConfigDiscovery::discover(cli_config_path);

        if let Some(requested) = cli_config_path
            && files.cli.is_none()
        {
            return Err(ConfigError::ConfigFileNotFound(requested.to_path_buf()).into());
        }

        debug!(?files, "Discovered config files");

        let merged = ConfigMerger::merge(&files)?;
        ConfigValidator::validate(&merged)?;

        Ok(merged)
    }
}

#[cfg(test)]
mod integration_tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_no_config() {
        let config = ConfigManager::load(None, true).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_missing_cli_config() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.toml");

        let err = ConfigManager::load(Some(&missing), false).unwrap_err();

        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_cli_config_validated() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mapsync.toml");
        fs::write(
            &path,
            r#"
            [[category]]
            name = "maps"

            [[category]]
            name = "maps"
            "#,
        )
        .unwrap();

        let err = ConfigManager::load(Some(&path), false).unwrap_err();

        assert!(err.to_string().contains("Duplicate category"));
    }

    #[test]
    fn test_load_cli_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mapsync.toml");
        fs::write(
            &path,
            r#"
            base_dir = "."

            [[category]]
            name = "scenes"
            include_hashes = true
            "#,
        )
        .unwrap();

        let config = ConfigManager::load(Some(&path), false).unwrap();

        assert!(config.categories.iter().any(|c| c.name == "scenes"));
        // Higher-precedence CLI config wins over any discovered file
        assert_eq!(config.base_dir, Some(tmp.path().join(".")));
    }
}
