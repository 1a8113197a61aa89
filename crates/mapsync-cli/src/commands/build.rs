use mapsync_core::sync::SyncReporter;

use crate::commands::{CommandOptions, Unzip};

pub struct Build;

impl Build {
    pub fn execute(categories: &[String], options: &CommandOptions) -> anyhow::Result<()> {
        if options.verbose {
            eprintln!("Executing build command");
        }

        let (pipeline, categories) = options.pipeline(categories)?;
        let mut failed_archives = 0;
        let mut link_errors = 0;

        for category in &categories {
            let report = pipeline.build(category)?;

            println!("{}", Unzip::summary(&category.name, &report.unzip));
            println!("{}", SyncReporter::generate_summary(&report.sync));

            let manifest = pipeline.layout(category).manifest();
            if report.manifest_changed {
                println!("Manifest updated: {}", manifest.display());
            } else {
                println!("Manifest unchanged: {}", manifest.display());
            }

            failed_archives += report.unzip.expand.failures.len();
            link_errors += report.sync.errors.len();
        }

        if failed_archives > 0 || link_errors > 0 {
            anyhow::bail!(
                "{failed_archives} archive(s) failed to extract, {link_errors} link(s) could not be synchronized"
            );
        }

        Ok(())
    }
}
