//! Per-segment cleanup of path components

use std::sync::LazyLock;

use regex::Regex;

static BRACKETS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[()\[\]']").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{2,}").expect("valid regex"));
static EDGE_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^_|_$").expect("valid regex"));
static UNDERSCORE_DOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_\.").expect("valid regex"));

/// Clean a single path segment
///
/// Brackets and apostrophes are dropped, whitespace runs become one
/// underscore, a leading and trailing underscore are stripped and an
/// underscore directly before a period is removed.
pub fn clean(segment: &str, collapse_repeated_delimiters: bool) -> String {
    let mut cleaned = BRACKETS.replace_all(segment, "").into_owned();
    cleaned = WHITESPACE.replace_all(&cleaned, "_").into_owned();
    if collapse_repeated_delimiters {
        cleaned = UNDERSCORES.replace_all(&cleaned, "_").into_owned();
    }
    cleaned = EDGE_UNDERSCORE.replace_all(&cleaned, "").into_owned();
    UNDERSCORE_DOT.replace_all(&cleaned, ".").into_owned()
}
