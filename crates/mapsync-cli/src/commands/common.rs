//! Common types and utilities for command execution

use std::path::{Path, PathBuf};

use anyhow::Context;
use mapsync_core::config::{CategoryConfig, Config, ConfigManager};
use mapsync_core::pipeline::Pipeline;

/// Execution options shared by every command
pub struct CommandOptions<'a> {
    /// Enable verbose output
    pub verbose: bool,
    /// Preview changes without applying (dry-run)
    pub dry_run: bool,
    /// Base directory given on the command line
    pub base_dir: Option<&'a Path>,
    /// Path to custom config file
    pub config_path: Option<&'a Path>,
    /// Skip loading all config files
    pub no_config: bool,
}

impl<'a> CommandOptions<'a> {
    /// Create new command options
    #[must_use]
    pub const fn new(
        verbose: bool,
        dry_run: bool,
        base_dir: Option<&'a Path>,
        config_path: Option<&'a Path>,
        no_config: bool,
    ) -> Self {
        Self {
            verbose,
            dry_run,
            base_dir,
            config_path,
            no_config,
        }
    }

    /// Load the merged configuration
    pub fn load_config(&self) -> anyhow::Result<Config> {
        ConfigManager::load(self.config_path, self.no_config).context("Failed to load configuration")
    }

    /// Base directory: `--base-dir`, then the config's `base_dir`, then the
    /// current directory
    pub fn resolve_base_dir(&self, config: &Config) -> anyhow::Result<PathBuf> {
        if let Some(dir) = self.base_dir {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &config.base_dir {
            return Ok(dir.clone());
        }
        std::env::current_dir().context("Failed to get current directory")
    }

    /// Pipeline over the loaded configuration plus the selected categories
    pub fn pipeline(&self, names: &[String]) -> anyhow::Result<(Pipeline, Vec<CategoryConfig>)> {
        let config = self.load_config()?;
        let base_dir = self.resolve_base_dir(&config)?;

        if self.verbose {
            eprintln!("Base directory: {}", base_dir.display());
            eprintln!("Dry run: {}", self.dry_run);
        }

        let pipeline = Pipeline::new(config, base_dir).with_dry_run(self.dry_run);
        let categories = pipeline.categories(names)?;

        Ok((pipeline, categories))
    }
}
