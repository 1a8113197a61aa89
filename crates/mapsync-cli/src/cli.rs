use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Asset archive mirroring tool
///
/// Unzip downloaded asset archives, prune junk, and mirror the result into a
/// directory of symbolic links with cleaned-up names
#[derive(Parser, Debug)]
#[command(name = "mapsync")]
#[command(about, long_about = None, version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Preview changes without executing (dry-run)
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Directory holding raw/, the mirrors and the manifests (default: from config, else current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub base_dir: Option<PathBuf>,

    /// Use specific config file
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore all config files
    #[arg(long, global = true, conflicts_with = "config")]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Category selection shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct CategoryArgs {
    /// Only process the named category (repeatable; default: all)
    #[arg(short, long = "category", value_name = "NAME")]
    pub categories: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract downloaded archives and prune junk entries
    Unzip {
        #[command(flatten)]
        select: CategoryArgs,
    },

    /// Mirror extracted archives into the link tree
    Sync {
        #[command(flatten)]
        select: CategoryArgs,
    },

    /// Unzip, sync and write the manifest
    Build {
        #[command(flatten)]
        select: CategoryArgs,
    },

    /// Show how the manifest would change without writing it
    Diff {
        #[command(flatten)]
        select: CategoryArgs,
    },

    /// Print a browser console snippet that downloads missing archives
    #[command(alias = "download")]
    GenerateDownloadHelper {
        #[command(flatten)]
        select: CategoryArgs,

        /// Delay between downloads in milliseconds (overrides config)
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,
    },

    /// Show the effective configuration as TOML
    Config {
        #[command(flatten)]
        select: CategoryArgs,
    },
}
