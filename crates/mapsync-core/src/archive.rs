//! Archive extraction
//!
//! Every archive matching a glob is unpacked into one working directory,
//! keeping the archive's internal layout. Existing files are overwritten, so
//! expanding the same archives again is harmless.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::config::Layout;
use crate::error::Result;

/// Outcome of expanding a set of archives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandReport {
    /// Archives extracted successfully
    pub extracted: Vec<PathBuf>,
    /// Files written across all archives
    pub files_written: usize,
    /// Entry names refused because they would escape the target
    pub unsafe_entries: Vec<String>,
    /// Archives that could not be extracted, with the reason
    pub failures: Vec<String>,
}

impl ExpandReport {
    /// Whether every archive was extracted
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Extracts zip archives into a working directory
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExpander {
    dry_run: bool,
}

impl ArchiveExpander {
    /// Create a new expander
    #[must_use]
    pub const fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Archives in `archive_dir` whose file name matches `pattern`, sorted
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid or the directory cannot be
    /// listed.
    pub fn find_archives(archive_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        let full_pattern = format!(
            "{}/{pattern}",
            glob::Pattern::escape(&archive_dir.to_string_lossy())
        );

        let mut archives = Vec::new();
        for path in glob::glob(&full_pattern)
            .with_context(|| format!("Invalid archive pattern: '{pattern}'"))?
        {
            let path = path.context("Failed to read archive directory")?;
            if path.is_file() {
                archives.push(path);
            }
        }

        archives.sort();
        Ok(archives)
    }

    /// Extract every archive matching `pattern` in `archive_dir` into `target`
    ///
    /// A failing archive is recorded in the report and the remaining
    /// archives are still extracted.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive directory is missing, the pattern is
    /// invalid, or the target cannot be created.
    pub fn expand(&self, archive_dir: &Path, pattern: &str, target: &Path) -> Result<ExpandReport> {
        Layout::require_dir("Archive", archive_dir)?;

        let archives = Self::find_archives(archive_dir, pattern)?;
        let mut report = ExpandReport::default();

        if archives.is_empty() {
            info!("No archives matching '{pattern}' in {}", archive_dir.display());
            return Ok(report);
        }

        if !self.dry_run {
            fs::create_dir_all(target)
                .with_context(|| format!("Failed to create directory: {}", target.display()))?;
        }

        for archive in archives {
            if self.dry_run {
                eprintln!(
                    "[DRY RUN] Would extract: {} -> {}",
                    archive.display(),
                    target.display()
                );
                report.extracted.push(archive);
                continue;
            }

            match Self::extract_one(&archive, target, &mut report) {
                Ok(written) => {
                    info!("Extracted {} ({written} files)", archive.display());
                    report.files_written += written;
                    report.extracted.push(archive);
                }
                Err(e) => {
                    warn!("Failed to extract {}: {e:#}", archive.display());
                    report.failures.push(format!("{}: {e:#}", archive.display()));
                }
            }
        }

        Ok(report)
    }

    /// Extract a single archive, returning the number of files written
    fn extract_one(archive: &Path, target: &Path, report: &mut ExpandReport) -> Result<usize> {
        let file = File::open(archive)
            .with_context(|| format!("Failed to open archive: {}", archive.display()))?;
        let mut zip = ZipArchive::new(BufReader::new(file))
            .with_context(|| format!("Failed to read archive: {}", archive.display()))?;

        let mut written = 0;
        for index in 0..zip.len() {
            let mut entry = zip
                .by_index(index)
                .with_context(|| format!("Failed to read entry #{index}"))?;

            let Some(relative) = entry.enclosed_name() else {
                warn!("Skipping unsafe entry '{}' in {}", entry.name(), archive.display());
                report.unsafe_entries.push(entry.name().to_string());
                continue;
            };
            let out_path = target.join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&out_path).with_context(|| {
                    format!("Failed to create directory: {}", out_path.display())
                })?;
                continue;
            }

            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }

            let mut out = File::create(&out_path)
                .with_context(|| format!("Failed to create file: {}", out_path.display()))?;
            io::copy(&mut entry, &mut out)
                .with_context(|| format!("Failed to extract: {}", out_path.display()))?;

            debug!(path = %out_path.display(), "Extracted");
            written += 1;
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, files: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, content) in files {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_expand_preserves_structure() {
        let tmp = TempDir::new().unwrap();
        let zipped = tmp.path().join("zipped");
        let unzipped = tmp.path().join("unzipped");
        fs::create_dir(&zipped).unwrap();
        write_zip(
            &zipped.join("Cave.zip"),
            &[("Cave/Gridless/Cave.png", "png"), ("Cave/readme.txt", "hi")],
        );

        let report = ArchiveExpander::new(false)
            .expand(&zipped, "*.zip", &unzipped)
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.extracted.len(), 1);
        assert_eq!(report.files_written, 2);
        assert_eq!(
            fs::read_to_string(unzipped.join("Cave/Gridless/Cave.png")).unwrap(),
            "png"
        );
    }

    #[test]
    fn test_expand_twice_overwrites() {
        let tmp = TempDir::new().unwrap();
        let zipped = tmp.path().join("zipped");
        let unzipped = tmp.path().join("unzipped");
        fs::create_dir(&zipped).unwrap();
        write_zip(&zipped.join("a.zip"), &[("a.txt", "v1")]);

        let expander = ArchiveExpander::new(false);
        expander.expand(&zipped, "*.zip", &unzipped).unwrap();
        fs::write(unzipped.join("a.txt"), "edited").unwrap();
        let report = expander.expand(&zipped, "*.zip", &unzipped).unwrap();

        assert!(report.is_success());
        assert_eq!(fs::read_to_string(unzipped.join("a.txt")).unwrap(), "v1");
    }

    #[test]
    fn test_corrupt_archive_is_reported_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let zipped = tmp.path().join("zipped");
        let unzipped = tmp.path().join("unzipped");
        fs::create_dir(&zipped).unwrap();
        fs::write(zipped.join("bad.zip"), "not a zip").unwrap();
        write_zip(&zipped.join("good.zip"), &[("good.txt", "ok")]);

        let report = ArchiveExpander::new(false)
            .expand(&zipped, "*.zip", &unzipped)
            .unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].contains("bad.zip"));
        assert_eq!(report.extracted.len(), 1);
        assert!(unzipped.join("good.txt").exists());
    }

    #[test]
    fn test_pattern_filters_archives() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.zip"), "").unwrap();
        fs::write(tmp.path().join("b.txt"), "").unwrap();

        let archives = ArchiveExpander::find_archives(tmp.path(), "*.zip").unwrap();

        assert_eq!(archives, vec![tmp.path().join("a.zip")]);
    }

    #[test]
    fn test_dry_run_extracts_nothing() {
        let tmp = TempDir::new().unwrap();
        let zipped = tmp.path().join("zipped");
        let unzipped = tmp.path().join("unzipped");
        fs::create_dir(&zipped).unwrap();
        write_zip(&zipped.join("a.zip"), &[("a.txt", "v1")]);

        let report = ArchiveExpander::new(true)
            .expand(&zipped, "*.zip", &unzipped)
            .unwrap();

        assert_eq!(report.extracted.len(), 1);
        assert!(!unzipped.exists());
    }

    #[test]
    fn test_missing_archive_dir() {
        let tmp = TempDir::new().unwrap();
        let result =
            ArchiveExpander::new(false).expand(&tmp.path().join("none"), "*.zip", tmp.path());
        assert!(result.is_err());
    }
}
