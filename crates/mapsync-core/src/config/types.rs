//! Configuration types and structures

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::normalize::{NameNormalizer, NormalizeOptions, RuleSet};

/// Junk entries pruned from the raw root on every unzip
pub const DEFAULT_JUNK_PATTERNS: &[&str] = &["__MACOSX", ".DS_Store"];

/// Delay between simulated clicks in the download helper
pub const DEFAULT_DOWNLOAD_DELAY_MS: u64 = 7000;

/// Name of the category used when no config declares any
pub const DEFAULT_CATEGORY: &str = "maps";

fn default_archive_glob() -> String {
    "*.zip".to_string()
}

fn default_exclude_patterns() -> Vec<String> {
    vec!["*ridded*".to_string()]
}

fn default_skip_downloads() -> Vec<String> {
    vec!["ridded".to_string()]
}

/// Normalizer settings for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NormalizeConfig {
    /// Ordered phrases to remove
    #[serde(default)]
    pub words: RuleSet,

    /// Behaviour switches
    #[serde(flatten)]
    pub options: NormalizeOptions,
}

impl NormalizeConfig {
    /// Build the normalizer described by these settings
    #[must_use]
    pub fn normalizer(&self) -> NameNormalizer {
        NameNormalizer::new(self.words.clone(), self.options.clone())
    }
}

/// A named collection of downloaded archives and its mirror
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Category name, used for directory names
    pub name: String,

    /// Page the archives are downloaded from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Glob selecting archives inside the zipped root
    #[serde(default = "default_archive_glob")]
    pub archive_glob: String,

    /// Gitignore-style patterns pruned from the unzipped root
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Record SHA-256 digests in the manifest
    #[serde(default)]
    pub include_hashes: bool,

    /// Link texts containing any of these are never clicked by the download helper
    #[serde(default = "default_skip_downloads")]
    pub skip_downloads: Vec<String>,

    /// Name normalization settings
    #[serde(default)]
    pub normalize: NormalizeConfig,
}

impl CategoryConfig {
    /// Create a category with default settings
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: None,
            archive_glob: default_archive_glob(),
            exclude_patterns: default_exclude_patterns(),
            include_hashes: false,
            skip_downloads: default_skip_downloads(),
            normalize: NormalizeConfig::default(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Directory holding `raw/`, the mirrors and the manifests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,

    /// Delay between downloads in the generated helper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_delay_ms: Option<u64>,

    /// Extra gitignore-style patterns pruned from the raw root
    #[serde(default)]
    pub junk_patterns: Vec<String>,

    /// Configured categories
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryConfig>,
}

impl Config {
    /// Categories to operate on, falling back to the built-in one
    #[must_use]
    pub fn effective_categories(&self) -> Vec<CategoryConfig> {
        if self.categories.is_empty() {
            vec![CategoryConfig::new(DEFAULT_CATEGORY)]
        } else {
            self.categories.clone()
        }
    }

    /// Built-in junk patterns followed by configured ones
    #[must_use]
    pub fn effective_junk_patterns(&self) -> Vec<String> {
        let mut patterns: Vec<String> = DEFAULT_JUNK_PATTERNS
            .iter()
            .map(|p| (*p).to_string())
            .collect();
        for pattern in &self.junk_patterns {
            if !patterns.contains(pattern) {
                patterns.push(pattern.clone());
            }
        }
        patterns
    }

    /// Configured download delay or the default
    #[must_use]
    pub fn download_delay_ms(&self) -> u64 {
        self.download_delay_ms.unwrap_or(DEFAULT_DOWNLOAD_DELAY_MS)
    }
}
