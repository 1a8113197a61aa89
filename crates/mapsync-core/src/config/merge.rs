//! Configuration merging with precedence rules
//!
//! # Merging Semantics
//!
//! - **Scalars** (`base_dir`, `download_delay_ms`): a higher-precedence file
//!   overrides a lower one when it sets the value
//! - **`junk_patterns`**: additive, duplicates dropped
//! - **Categories**: replaced whole by name, new names appended
//!
//! A relative `base_dir` is resolved against the directory of the file that
//! declares it.

use std::fs;
use std::path::Path;

use anyhow::Context;

use super::discovery::ConfigFiles;
use super::types::Config;
use crate::error::Result;

/// Configuration merger
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple config files with precedence rules
    ///
    /// Precedence order (highest to lowest):
    /// 1. CLI config
    /// 2. .mapsync.local.toml
    /// 3. .mapsync.toml
    /// 4. Global config
    ///
    /// # Errors
    ///
    /// Returns an error if config files cannot be read or parsed.
    pub fn merge(files: &ConfigFiles) -> Result<Config> {
        let mut merged = Config::default();

        for path in files.in_merge_order() {
            let config = Self::load_file(path)?;
            Self::merge_into(&mut merged, config);
        }

        Ok(merged)
    }

    /// Parse a single config file, resolving its relative `base_dir`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(base) = config.base_dir.take() {
            let resolved = match path.parent() {
                Some(parent) if base.is_relative() => parent.join(base),
                _ => base,
            };
            config.base_dir = Some(resolved);
        }

        Ok(config)
    }

    /// Merge `overlay` on top of `base`
    pub fn merge_into(base: &mut Config, overlay: Config) {
        if overlay.base_dir.is_some() {
            base.base_dir = overlay.base_dir;
        }

        if overlay.download_delay_ms.is_some() {
            base.download_delay_ms = overlay.download_delay_ms;
        }

        for pattern in overlay.junk_patterns {
            if !base.junk_patterns.contains(&pattern) {
                base.junk_patterns.push(pattern);
            }
        }

        for category in overlay.categories {
            if let Some(existing) = base
                .categories
                .iter_mut()
                .find(|c| c.name == category.name)
            {
                *existing = category;
            } else {
                base.categories.push(category);
            }
        }
    }
}
