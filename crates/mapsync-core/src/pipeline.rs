//! Stage orchestration for one or more categories
//!
//! Each stage is a separate idempotent pass over the category's
//! [`Layout`]. `build` runs them in order: expand archives, prune, mirror
//! with the category's normalizer, write the manifest.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::archive::{ArchiveExpander, ExpandReport};
use crate::config::{CategoryConfig, Config, ConfigError, Layout};
use crate::error::Result;
use crate::helper::DownloadHelper;
use crate::manifest::ManifestBuilder;
use crate::prune::JunkPruner;
use crate::sync::{SymlinkSyncEngine, SyncResult};

/// Outcome of the unzip stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnzipReport {
    /// Archive extraction outcome
    pub expand: ExpandReport,
    /// Entries removed by category exclude patterns and global junk patterns
    pub pruned: Vec<PathBuf>,
}

/// Outcome of a full build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Unzip stage outcome
    pub unzip: UnzipReport,
    /// Mirror stage outcome
    pub sync: SyncResult,
    /// Whether the manifest file was (or would be) rewritten
    pub manifest_changed: bool,
}

impl BuildReport {
    /// Whether every archive extracted and every link was reconciled
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.unzip.expand.is_success() && self.sync.is_success()
    }
}

/// Runs pipeline stages against the directories of a base directory
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    base_dir: PathBuf,
    dry_run: bool,
}

impl Pipeline {
    /// Create a pipeline rooted at `base_dir`
    #[must_use]
    pub const fn new(config: Config, base_dir: PathBuf) -> Self {
        Self {
            config,
            base_dir,
            dry_run: false,
        }
    }

    /// Report what would change instead of changing it
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Effective configuration
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Base directory holding `raw/`, mirrors and manifests
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory layout of a category
    #[must_use]
    pub fn layout(&self, category: &CategoryConfig) -> Layout {
        Layout::new(&self.base_dir, &category.name)
    }

    /// Categories selected by name, or all of them when `names` is empty
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCategory`] for a name that is not
    /// configured.
    pub fn categories(&self, names: &[String]) -> Result<Vec<CategoryConfig>> {
        let available = self.config.effective_categories();

        if names.is_empty() {
            return Ok(available);
        }

        let mut selected: Vec<CategoryConfig> = Vec::with_capacity(names.len());
        for name in names {
            let category = available
                .iter()
                .find(|c| &c.name == name)
                .ok_or_else(|| ConfigError::UnknownCategory(name.clone()))?;
            if !selected.iter().any(|c| c.name == category.name) {
                selected.push(category.clone());
            }
        }

        Ok(selected)
    }

    /// Extract the category's archives, then prune excluded and junk entries
    ///
    /// # Errors
    ///
    /// Returns an error if the zipped root is missing or pruning fails.
    /// Individual archive failures are recorded in the report instead.
    pub fn unzip(&self, category: &CategoryConfig) -> Result<UnzipReport> {
        let layout = self.layout(category);
        info!("Unzipping category '{}'", category.name);

        let expand = ArchiveExpander::new(self.dry_run).expand(
            &layout.zipped(),
            &category.archive_glob,
            &layout.unzipped(),
        )?;

        let mut pruned = JunkPruner::new(&category.exclude_patterns)?
            .with_dry_run(self.dry_run)
            .prune(&layout.unzipped())?
            .removed;
        pruned.extend(
            JunkPruner::new(&self.config.effective_junk_patterns())?
                .with_dry_run(self.dry_run)
                .prune(&layout.raw_root())?
                .removed,
        );
        debug!(count = pruned.len(), "Pruned entries");

        Ok(UnzipReport { expand, pruned })
    }

    /// Mirror the unzipped root into the category's mirror root
    ///
    /// # Errors
    ///
    /// Returns an error if the unzipped root is missing or the roots overlap.
    pub fn sync(&self, category: &CategoryConfig) -> Result<SyncResult> {
        let layout = self.layout(category);
        info!("Syncing category '{}'", category.name);

        SymlinkSyncEngine::new(category.normalize.normalizer())
            .with_dry_run(self.dry_run)
            .sync(&layout.unzipped(), &layout.mirror())
    }

    /// Rebuild the manifest of the category's mirror and write it if changed
    ///
    /// Returns whether the file changed. In a dry run nothing is written and
    /// the return value says whether it would have been.
    ///
    /// # Errors
    ///
    /// Returns an error if the mirror root is missing or the manifest cannot
    /// be written.
    pub fn manifest(&self, category: &CategoryConfig) -> Result<bool> {
        let layout = self.layout(category);
        let manifest = ManifestBuilder::new(category.include_hashes).build(&layout.mirror())?;
        let path = layout.manifest();

        if self.dry_run {
            let changed = manifest.diff_against_file(&path, false)?.is_some();
            if changed {
                eprintln!("[DRY RUN] Would write manifest: {}", path.display());
            }
            return Ok(changed);
        }

        manifest.write(&path)
    }

    /// Run every stage for one category
    ///
    /// A dry run over a category that has never been unzipped stops after the
    /// unzip stage, since there is nothing to mirror yet.
    ///
    /// # Errors
    ///
    /// Returns the first fatal stage error.
    pub fn build(&self, category: &CategoryConfig) -> Result<BuildReport> {
        let unzip = self.unzip(category)?;
        let layout = self.layout(category);

        if self.dry_run && !layout.unzipped().is_dir() {
            eprintln!(
                "[DRY RUN] Would sync: {} -> {}",
                layout.unzipped().display(),
                layout.mirror().display()
            );
            return Ok(BuildReport {
                unzip,
                ..BuildReport::default()
            });
        }

        let sync = self.sync(category)?;

        let manifest_changed = if self.dry_run && !layout.mirror().is_dir() {
            true
        } else {
            self.manifest(category)?
        };

        Ok(BuildReport {
            unzip,
            sync,
            manifest_changed,
        })
    }

    /// Diff between the stored manifest and one rebuilt from the mirror
    ///
    /// # Errors
    ///
    /// Returns an error if the mirror root is missing or the stored manifest
    /// cannot be read.
    pub fn manifest_diff(&self, category: &CategoryConfig, color: bool) -> Result<Option<String>> {
        let layout = self.layout(category);
        ManifestBuilder::new(category.include_hashes)
            .build(&layout.mirror())?
            .diff_against_file(&layout.manifest(), color)
    }

    /// Render the download helper for a category
    ///
    /// `delay_ms` overrides the configured delay.
    ///
    /// # Errors
    ///
    /// Returns an error if the delay is zero or the zipped root cannot be
    /// listed.
    pub fn download_helper(&self, category: &CategoryConfig, delay_ms: Option<u64>) -> Result<String> {
        let delay_ms = delay_ms.unwrap_or_else(|| self.config.download_delay_ms());
        if delay_ms == 0 {
            return Err(ConfigError::ZeroDelay.into());
        }

        let layout = self.layout(category);
        let helper = DownloadHelper {
            already_downloaded: DownloadHelper::downloaded_archives(
                &layout.zipped(),
                &category.archive_glob,
            )?,
            origin: category.origin.clone(),
            delay: Duration::from_millis(delay_ms),
            skip_substrings: category.skip_downloads.clone(),
        };

        helper.render()
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};
    use std::io::Write;

    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    use super::*;

    fn write_zip(path: &Path, files: &[(&str, &str)]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, content) in files {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    fn seeded_base() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let zipped = tmp.path().join("raw/maps-zipped");
        fs::create_dir_all(&zipped).unwrap();
        write_zip(
            &zipped.join("Cave.zip"),
            &[
                ("Cave/Gridless/Cave (Night).png", "night"),
                ("Cave/Gridded/Cave (Night).png", "grid"),
                ("__MACOSX/Cave/._Cave.png", ""),
            ],
        );
        tmp
    }

    #[test]
    fn test_categories_default_and_filter() {
        let pipeline = Pipeline::new(Config::default(), PathBuf::from("."));

        let all = pipeline.categories(&[]).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "maps");

        let err = pipeline.categories(&["tokens".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Unknown category 'tokens'"));
    }

    #[test]
    fn test_categories_deduplicates_requests() {
        let pipeline = Pipeline::new(Config::default(), PathBuf::from("."));
        let names = vec!["maps".to_string(), "maps".to_string()];

        assert_eq!(pipeline.categories(&names).unwrap().len(), 1);
    }

    #[test]
    fn test_unzip_extracts_and_prunes() {
        let tmp = seeded_base();
        let pipeline = Pipeline::new(Config::default(), tmp.path().to_path_buf());
        let category = CategoryConfig::new("maps");

        let report = pipeline.unzip(&category).unwrap();

        let unzipped = tmp.path().join("raw/maps-unzipped");
        assert!(report.expand.is_success());
        assert!(unzipped.join("Cave/Gridless/Cave (Night).png").exists());
        assert!(!unzipped.join("Cave/Gridded").exists());
        assert!(!unzipped.join("__MACOSX").exists());
        assert_eq!(report.pruned.len(), 2);
    }

    #[test]
    #[cfg(unix)]
    fn test_build_end_to_end() {
        let tmp = seeded_base();
        let pipeline = Pipeline::new(Config::default(), tmp.path().to_path_buf());
        let category = CategoryConfig::new("maps");

        let report = pipeline.build(&category).unwrap();

        assert!(report.is_success());
        assert_eq!(report.sync.created, 1);
        assert!(report.manifest_changed);

        let link = tmp.path().join("maps/Cave/Cave_Night.png");
        assert!(link.is_symlink());
        assert_eq!(fs::read_to_string(&link).unwrap(), "night");

        let manifest = fs::read_to_string(tmp.path().join("maps-manifest.json")).unwrap();
        assert!(manifest.contains("\"Cave/Cave_Night.png\""));

        let again = pipeline.build(&category).unwrap();
        assert_eq!(again.sync.total_operations(), 0);
        assert!(!again.manifest_changed);
        assert!(pipeline.manifest_diff(&category, false).unwrap().is_none());
    }

    #[test]
    fn test_dry_run_build_touches_nothing() {
        let tmp = seeded_base();
        let pipeline =
            Pipeline::new(Config::default(), tmp.path().to_path_buf()).with_dry_run(true);

        let report = pipeline.build(&CategoryConfig::new("maps")).unwrap();

        assert_eq!(report.unzip.expand.extracted.len(), 1);
        assert!(!tmp.path().join("raw/maps-unzipped").exists());
        assert!(!tmp.path().join("maps").exists());
        assert!(!tmp.path().join("maps-manifest.json").exists());
    }

    #[test]
    fn test_missing_zipped_root_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let pipeline = Pipeline::new(Config::default(), tmp.path().to_path_buf());

        let err = pipeline.unzip(&CategoryConfig::new("maps")).unwrap_err();

        assert!(err.to_string().contains("Archive directory does not exist"));
    }

    #[test]
    fn test_download_helper_lists_archives() {
        let tmp = seeded_base();
        let pipeline = Pipeline::new(Config::default(), tmp.path().to_path_buf());
        let category = CategoryConfig::new("maps");

        let js = pipeline.download_helper(&category, Some(250)).unwrap();

        assert!(js.contains(r#"window.alreadyDownloaded = ["Cave.zip"];"#));
        assert!(js.contains("await delay(250);"));
    }

    #[test]
    fn test_download_helper_rejects_zero_delay() {
        let pipeline = Pipeline::new(Config::default(), PathBuf::from("."));

        let err = pipeline
            .download_helper(&CategoryConfig::new("maps"), Some(0))
            .unwrap_err();

        assert!(err.to_string().contains("greater than zero"));
    }
}
