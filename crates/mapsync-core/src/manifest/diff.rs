//! Line diffs between manifest versions

use std::fmt::Write;

use similar::{ChangeTag, TextDiff};

const DIFF_CONTEXT_LINES: usize = 3;

/// Render a unified-style diff of two manifest documents
///
/// Returns `None` when the documents are identical.
#[must_use]
pub fn render(old: &str, new: &str, old_label: &str, new_label: &str, color: bool) -> Option<String> {
    if old == new {
        return None;
    }

    let diff = TextDiff::from_lines(old, new);
    let (bold, red, green, reset) = if color {
        ("\x1b[1m", "\x1b[31m", "\x1b[32m", "\x1b[0m")
    } else {
        ("", "", "", "")
    };

    let mut output = String::new();
    let _ = writeln!(output, "{bold}--- {old_label}{reset}");
    let _ = writeln!(output, "{bold}+++ {new_label}{reset}");

    for (idx, group) in diff.grouped_ops(DIFF_CONTEXT_LINES).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let (sign, tint) = match change.tag() {
                    ChangeTag::Delete => ("-", red),
                    ChangeTag::Insert => ("+", green),
                    ChangeTag::Equal => (" ", ""),
                };

                let newline = if change.value().ends_with('\n') { "" } else { "\n" };
                let _ = write!(output, "{tint}{sign}{}{newline}{reset}", change.value());
            }
        }
    }

    Some(output)
}
