mod build;
mod common;
mod config;
mod diff;
mod download;
mod sync;
mod unzip;

pub use build::Build;
pub use common::CommandOptions;
pub use config::Config;
pub use diff::Diff;
pub use download::Download;
pub use sync::SyncLinks;
pub use unzip::Unzip;
