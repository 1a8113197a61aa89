//! Browser download helper generation
//!
//! Produces a snippet to paste into the developer console of the page the
//! archives are published on. It clicks every `.zip` link that has not been
//! downloaded yet, pausing between clicks. The text is only ever printed;
//! nothing here runs it.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use crate::error::Result;

/// Parameters for the generated snippet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadHelper {
    /// Archive file names already present locally
    pub already_downloaded: Vec<String>,
    /// Page the snippet is meant to run on
    pub origin: Option<String>,
    /// Pause between downloads
    pub delay: Duration,
    /// Link texts containing any of these are skipped
    pub skip_substrings: Vec<String>,
}

impl DownloadHelper {
    /// Render the snippet
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter cannot be encoded as a JSON literal.
    pub fn render(&self) -> Result<String> {
        let existing = serde_json::to_string(&self.already_downloaded)
            .context("Failed to encode downloaded file list")?;
        let origin =
            serde_json::to_string(&self.origin).context("Failed to encode origin reference")?;
        let skip = serde_json::to_string(&self.skip_substrings)
            .context("Failed to encode skip list")?;
        let delay_ms = self.delay.as_millis();

        Ok(format!(
            r#"
// Initialize alreadyDownloaded array if not already set
window.alreadyDownloaded = window.alreadyDownloaded || [];

// Archives already present locally
window.alreadyDownloaded = {existing};

// Page this helper was generated for
const expectedOrigin = {origin};

// Link texts containing any of these are never downloaded
const skipSubstrings = {skip};

// Helper function to create a delay using Promise and await
function delay(ms) {{
  return new Promise((resolve) => setTimeout(resolve, ms));
}}

// Function to find and download new zip files
async function downloadZips() {{
  if (expectedOrigin && !window.location.href.startsWith(expectedOrigin)) {{
    console.warn("Expected to run on " + expectedOrigin + ", currently on " + window.location.href);
  }}

  // Find all links to zip files
  let links = Array.from(document.querySelectorAll("a[href]"));
  links = links.filter((link) => link.innerHTML && link.innerHTML.includes(".zip"));

  for (const link of links) {{
    const fname = link.textContent.trim();

    if (skipSubstrings.some((s) => fname.includes(s)) || window.alreadyDownloaded.includes(fname)) continue;

    console.log(fname);
    link.click(); // Initiates download
    await delay({delay_ms}); // Wait before processing the next link
    window.alreadyDownloaded.push(fname);
  }}
}}

// Run the downloadZips function
downloadZips();
"#
        ))
    }

    /// Archive file names in `archive_dir` matching `pattern`, sorted
    ///
    /// A missing directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid or the directory cannot be
    /// read.
    pub fn downloaded_archives(archive_dir: &Path, pattern: &str) -> Result<Vec<String>> {
        if !archive_dir.is_dir() {
            return Ok(Vec::new());
        }

        let matcher = glob::Pattern::new(pattern)
            .with_context(|| format!("Invalid archive pattern: '{pattern}'"))?;

        let mut names = Vec::new();
        for entry in fs::read_dir(archive_dir)
            .with_context(|| format!("Failed to read directory: {}", archive_dir.display()))?
        {
            let entry = entry
                .with_context(|| format!("Failed to read directory: {}", archive_dir.display()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.path().is_file() && matcher.matches(&name) {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn helper() -> DownloadHelper {
        DownloadHelper {
            already_downloaded: vec!["Cave.zip".to_string(), "Dragon's \"Lair\".zip".to_string()],
            origin: Some("https://www.patreon.com/example".to_string()),
            delay: Duration::from_millis(7000),
            skip_substrings: vec!["ridded".to_string()],
        }
    }

    #[test]
    fn test_render_interpolates_parameters() {
        let js = helper().render().unwrap();

        assert!(js.contains(r#"window.alreadyDownloaded = ["Cave.zip","Dragon's \"Lair\".zip"];"#));
        assert!(js.contains(r#"const expectedOrigin = "https://www.patreon.com/example";"#));
        assert!(js.contains(r#"const skipSubstrings = ["ridded"];"#));
        assert!(js.contains("await delay(7000);"));
        assert!(js.contains("function delay(ms) {\n"));
        assert!(js.trim_end().ends_with("downloadZips();"));
    }

    #[test]
    fn test_render_without_origin() {
        let mut helper = helper();
        helper.origin = None;
        helper.already_downloaded.clear();

        let js = helper.render().unwrap();

        assert!(js.contains("const expectedOrigin = null;"));
        assert!(js.contains("window.alreadyDownloaded = [];"));
    }

    #[test]
    fn test_downloaded_archives() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.zip"), "").unwrap();
        fs::write(tmp.path().join("a.zip"), "").unwrap();
        fs::write(tmp.path().join("notes.txt"), "").unwrap();
        fs::create_dir(tmp.path().join("dir.zip")).unwrap();

        let names = DownloadHelper::downloaded_archives(tmp.path(), "*.zip").unwrap();

        assert_eq!(names, vec!["a.zip", "b.zip"]);
    }

    #[test]
    fn test_downloaded_archives_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let names = DownloadHelper::downloaded_archives(&tmp.path().join("none"), "*.zip").unwrap();
        assert!(names.is_empty());
    }
}
