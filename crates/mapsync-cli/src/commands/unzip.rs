use mapsync_core::pipeline::UnzipReport;

use crate::commands::CommandOptions;

pub struct Unzip;

impl Unzip {
    pub fn execute(categories: &[String], options: &CommandOptions) -> anyhow::Result<()> {
        if options.verbose {
            eprintln!("Executing unzip command");
        }

        let (pipeline, categories) = options.pipeline(categories)?;
        let mut failed = 0;

        for category in &categories {
            let report = pipeline.unzip(category)?;
            println!("{}", Self::summary(&category.name, &report));
            failed += report.expand.failures.len();
        }

        if failed > 0 {
            anyhow::bail!("{failed} archive(s) failed to extract");
        }

        Ok(())
    }

    /// One block per category: counts, then any failures
    pub fn summary(name: &str, report: &UnzipReport) -> String {
        let mut lines = vec![
            format!("[{name}]"),
            format!("  Archives:   {}", report.expand.extracted.len()),
            format!("  Files:      {}", report.expand.files_written),
            format!("  Pruned:     {}", report.pruned.len()),
        ];

        if !report.expand.unsafe_entries.is_empty() {
            lines.push(format!(
                "  Skipped unsafe entries: {}",
                report.expand.unsafe_entries.len()
            ));
        }

        for failure in &report.expand.failures {
            lines.push(format!("  ✗ {failure}"));
        }

        lines.join("\n")
    }
}
