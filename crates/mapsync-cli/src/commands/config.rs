use anyhow::Context;

use crate::commands::CommandOptions;

pub struct Config;

impl Config {
    pub fn execute(categories: &[String], options: &CommandOptions) -> anyhow::Result<()> {
        if options.verbose {
            eprintln!("Executing config command");
        }

        let (pipeline, categories) = options.pipeline(categories)?;

        // Show the categories actually in effect, built-in defaults included
        let mut effective = pipeline.config().clone();
        effective.base_dir = Some(pipeline.base_dir().to_path_buf());
        effective.download_delay_ms = Some(pipeline.config().download_delay_ms());
        effective.junk_patterns = pipeline.config().effective_junk_patterns();
        effective.categories = categories;

        let text =
            toml::to_string_pretty(&effective).context("Failed to serialize configuration")?;
        print!("{text}");

        Ok(())
    }
}
