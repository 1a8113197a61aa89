use mapsync_core::sync::SyncReporter;

use crate::commands::CommandOptions;

pub struct SyncLinks;

impl SyncLinks {
    pub fn execute(categories: &[String], options: &CommandOptions) -> anyhow::Result<()> {
        if options.verbose {
            eprintln!("Executing sync command");
        }

        let (pipeline, categories) = options.pipeline(categories)?;
        let mut errors = 0;

        for category in &categories {
            let result = pipeline.sync(category)?;
            println!("[{}]", category.name);
            println!("{}", SyncReporter::generate_summary(&result));
            errors += result.errors.len();
        }

        if errors > 0 {
            anyhow::bail!("{errors} link(s) could not be synchronized");
        }

        Ok(())
    }
}
