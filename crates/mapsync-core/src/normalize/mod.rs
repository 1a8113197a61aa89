//! Path name normalization
//!
//! Turns a raw relative asset path such as
//! `Cave (Gridless Part 1)/Cave Pt.1.png` into a clean mirror path
//! (`Cave/Cave.png`), or rejects it outright when it names an excluded
//! variant.
//!
//! A single pass runs these steps in order:
//! - exclusion test against the configured markers
//! - word removal using the ordered [`RuleSet`]
//! - per-segment cleanup (brackets, whitespace, underscores)
//! - removal of leftover variant directory names
//! - optional lowercasing
//!
//! Passes repeat until the output stops changing, so normalizing an
//! already-normalized path is a no-op.

mod rules;
mod segment;

pub use rules::RuleSet;

use serde::{Deserialize, Serialize};

/// Behaviour switches for the normalizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Collapse runs of underscores inside a segment into one
    pub collapse_repeated_delimiters: bool,

    /// Lowercase the final path
    pub lowercase_output: bool,

    /// Substrings that exclude a path when present anywhere in it.
    ///
    /// The path is tested with a leading `/`, so a marker like `/G_` also
    /// matches the first segment.
    pub exclude_markers: Vec<String>,

    /// Literal leftovers removed after segments are rejoined
    pub strip_remnants: Vec<String>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            collapse_repeated_delimiters: true,
            lowercase_output: false,
            exclude_markers: vec!["ridded".to_string(), "/G_".to_string()],
            strip_remnants: vec!["Gridless/".to_string(), "Gridded/".to_string()],
        }
    }
}

/// Maps a source-relative path to its mirror-relative path
///
/// Returning `None` excludes the entry from the mirror.
pub trait PathRenamer {
    /// Rename a `/`-separated relative path
    fn rename(&self, relative: &str) -> Option<String>;
}

impl<F> PathRenamer for F
where
    F: Fn(&str) -> Option<String>,
{
    fn rename(&self, relative: &str) -> Option<String> {
        self(relative)
    }
}

/// Rule-based path normalizer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameNormalizer {
    rules: RuleSet,
    options: NormalizeOptions,
}

impl NameNormalizer {
    /// Create a normalizer from a rule set and options
    #[must_use]
    pub const fn new(rules: RuleSet, options: NormalizeOptions) -> Self {
        Self { rules, options }
    }

    /// Normalize a relative path
    ///
    /// Returns `None` when the path, or any intermediate form of it, is
    /// excluded. The result may contain empty segments when every character
    /// of a segment was stripped.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let mut current = self.pass(raw)?;

        // After the first pass no step lengthens the path, so this settles
        loop {
            let next = self.pass(&current)?;
            if next == current {
                return Some(current);
            }
            current = next;
        }
    }

    /// Whether the path contains an exclusion marker
    #[must_use]
    pub fn is_excluded(&self, raw: &str) -> bool {
        let anchored = format!("/{raw}");
        self.options
            .exclude_markers
            .iter()
            .filter(|marker| !marker.is_empty())
            .any(|marker| anchored.contains(marker.as_str()))
    }

    fn pass(&self, raw: &str) -> Option<String> {
        if self.is_excluded(raw) {
            return None;
        }

        let stripped = self.rules.strip(raw);

        let mut joined = stripped
            .split('/')
            .map(|s| segment::clean(s, self.options.collapse_repeated_delimiters))
            .collect::<Vec<_>>()
            .join("/");

        for remnant in self.options.strip_remnants.iter().filter(|r| !r.is_empty()) {
            joined = joined.replace(remnant.as_str(), "");
        }

        if self.options.lowercase_output {
            joined = joined.to_lowercase();
        }

        Some(joined)
    }
}

impl PathRenamer for NameNormalizer {
    fn rename(&self, relative: &str) -> Option<String> {
        self.normalize(relative)
    }
}
