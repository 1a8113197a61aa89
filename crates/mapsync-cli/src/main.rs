mod cli;
mod commands;
mod logging;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use commands::CommandOptions;

fn main() -> anyhow::Result<()> {
    // Set up Ctrl+C handler; a re-run repairs any half-built mirror
    ctrlc::set_handler(|| {
        eprintln!("\n\nInterrupted by user (Ctrl+C)");
        std::process::exit(130); // Standard exit code for SIGINT
    })
    .context("Failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    logging::init(cli.verbose)?;

    let options = CommandOptions::new(
        cli.verbose,
        cli.dry_run,
        cli.base_dir.as_deref(),
        cli.config.as_deref(),
        cli.no_config,
    );

    match &cli.command {
        Commands::Unzip { select } => {
            commands::Unzip::execute(&select.categories, &options)
                .context("Failed to execute unzip command")?;
        }
        Commands::Sync { select } => {
            commands::SyncLinks::execute(&select.categories, &options)
                .context("Failed to execute sync command")?;
        }
        Commands::Build { select } => {
            commands::Build::execute(&select.categories, &options)
                .context("Failed to execute build command")?;
        }
        Commands::Diff { select } => {
            commands::Diff::execute(&select.categories, &options)
                .context("Failed to execute diff command")?;
        }
        Commands::GenerateDownloadHelper { select, delay_ms } => {
            commands::Download::execute(&select.categories, *delay_ms, &options)
                .context("Failed to execute generate-download-helper command")?;
        }
        Commands::Config { select } => {
            commands::Config::execute(&select.categories, &options)
                .context("Failed to execute config command")?;
        }
    }

    Ok(())
}
