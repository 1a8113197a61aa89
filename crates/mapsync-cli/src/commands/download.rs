use crate::commands::CommandOptions;

pub struct Download;

impl Download {
    pub fn execute(
        categories: &[String],
        delay_ms: Option<u64>,
        options: &CommandOptions,
    ) -> anyhow::Result<()> {
        if options.verbose {
            eprintln!("Executing generate-download-helper command");
        }

        let (pipeline, categories) = options.pipeline(categories)?;

        for category in &categories {
            if categories.len() > 1 {
                println!("// Category: {}", category.name);
            }
            print!("{}", pipeline.download_helper(category, delay_ms)?);
        }

        Ok(())
    }
}
