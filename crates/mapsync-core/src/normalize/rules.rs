//! Ordered word-removal rule set

use serde::{Deserialize, Serialize};

/// Phrases stripped from asset paths by default.
///
/// Longer phrases precede the shorter words they contain, so that
/// "(Gridded Part 1)" is removed whole before "Part 1" or "Gridded" can
/// take a bite out of it.
const DEFAULT_WORDS: &[&str] = &[
    "- $5 Rewards",
    "(Gridded Part 1)",
    "(Gridded Part 2)",
    "(Gridless Part 1)",
    "(Gridless Part 2)",
    "(Gridded Pt.1)",
    "(Gridded Pt.2)",
    "(Gridless Pt.1)",
    "(Gridless Pt.2)",
    "Pt 1",
    "Pt 2",
    "Pt 3",
    "Pt1",
    "Pt2",
    "Pt3",
    "Pt.1",
    "Pt.2",
    "Pt.3",
    "Pt. 1",
    "Pt. 2",
    "Pt. 3",
    "- Part 1",
    "- Part 2",
    "- Part 3",
    "Part 1",
    "Part 2",
    "Part 3",
    "- Gridless",
    "- Gridded",
    "(Gridded)",
    "(Gridless)",
    "Gridless",
    "Gridded",
];

/// Ordered list of literal phrases removed from a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    words: Vec<String>,
}

impl RuleSet {
    /// Create a rule set from phrases in removal order
    #[must_use]
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Phrases in removal order
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Remove every phrase in order, each from the result of the previous removal
    #[must_use]
    pub fn strip(&self, input: &str) -> String {
        self.words
            .iter()
            .filter(|word| !word.is_empty())
            .fold(input.to_string(), |acc, word| acc.replace(word.as_str(), ""))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS.iter().copied())
    }
}
