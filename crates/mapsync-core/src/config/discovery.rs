//! Config file lookup

use std::path::{Path, PathBuf};

const LOCAL_FILE: &str = ".mapsync.local.toml";
const PROJECT_FILE: &str = ".mapsync.toml";

/// Config files that were found, one slot per source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigFiles {
    /// `--config` path; overrides everything else
    pub cli: Option<PathBuf>,
    /// Nearest `.mapsync.local.toml`, for machine-specific overrides
    pub local: Option<PathBuf>,
    /// Nearest `.mapsync.toml`
    pub project: Option<PathBuf>,
    /// `<config dir>/mapsync/config.toml`
    pub global: Option<PathBuf>,
}

impl ConfigFiles {
    /// Present files from lowest to highest precedence
    pub fn in_merge_order(&self) -> impl Iterator<Item = &Path> {
        [&self.global, &self.project, &self.local, &self.cli]
            .into_iter()
            .filter_map(Option::as_deref)
    }
}

/// Locates config files around the working directory
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Look up config files starting at the current directory
    ///
    /// A `cli_path` that does not exist is left out; the caller decides
    /// whether that is an error.
    #[must_use]
    pub fn discover(cli_path: Option<&Path>) -> ConfigFiles {
        match std::env::current_dir() {
            Ok(cwd) => Self::discover_from(&cwd, cli_path),
            Err(_) => Self::discover_from(Path::new("."), cli_path),
        }
    }

    /// Look up config files starting at `start`, searching its ancestors
    #[must_use]
    pub fn discover_from(start: &Path, cli_path: Option<&Path>) -> ConfigFiles {
        ConfigFiles {
            cli: cli_path.filter(|p| p.is_file()).map(Path::to_path_buf),
            local: Self::nearest(start, LOCAL_FILE),
            project: Self::nearest(start, PROJECT_FILE),
            global: dirs::config_dir()
                .map(|dir| dir.join("mapsync").join("config.toml"))
                .filter(|p| p.is_file()),
        }
    }

    /// Closest `name` in `start` or one of its parents
    fn nearest(start: &Path, name: &str) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    }
}
