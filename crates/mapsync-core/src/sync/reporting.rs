//! Sync operation reporting and statistics

use std::fmt::Write;

use super::SyncResult;

/// Sync operation reporter
pub struct SyncReporter;

impl SyncReporter {
    /// Generate a summary report
    #[must_use]
    pub fn generate_summary(result: &SyncResult) -> String {
        let mut output = String::new();

        output.push_str("\n=== Sync Summary ===\n");
        let _ = writeln!(output, "Created:    {}", result.created);
        let _ = writeln!(output, "Replaced:   {}", result.replaced);
        let _ = writeln!(output, "Removed:    {}", result.removed);
        let _ = writeln!(output, "Unchanged:  {}", result.unchanged);
        let _ = writeln!(output, "Excluded:   {}", result.excluded);
        let _ = writeln!(output, "Collisions: {}", result.collisions);

        if !result.warnings.is_empty() {
            let _ = writeln!(output, "\nWarnings ({}):", result.warnings.len());
            for warning in &result.warnings {
                let _ = writeln!(output, "  - {warning}");
            }
        }

        if !result.errors.is_empty() {
            let _ = writeln!(output, "\nErrors ({}):", result.errors.len());
            for error in &result.errors {
                let _ = writeln!(output, "  - {error}");
            }
        }

        let _ = writeln!(
            output,
            "\nTotal operations: {}",
            result.total_operations()
        );

        if result.is_success() {
            output.push_str("Status: ✓ Success\n");
        } else {
            output.push_str("Status: ✗ Completed with errors\n");
        }

        output
    }
}
