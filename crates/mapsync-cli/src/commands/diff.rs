use std::io::IsTerminal;

use crate::commands::CommandOptions;

pub struct Diff;

impl Diff {
    pub fn execute(categories: &[String], options: &CommandOptions) -> anyhow::Result<()> {
        if options.verbose {
            eprintln!("Executing diff command");
        }

        let (pipeline, categories) = options.pipeline(categories)?;
        let color = std::io::stdout().is_terminal();

        for category in &categories {
            match pipeline.manifest_diff(category, color)? {
                Some(diff) => print!("{diff}"),
                None => println!("Manifest for '{}' is up to date", category.name),
            }
        }

        Ok(())
    }
}
