//! Configuration validation and error reporting

use std::collections::HashSet;

use super::error::ConfigError;
use super::types::{CategoryConfig, Config};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration
    ///
    /// # Errors
    ///
    /// Returns the first problem found as a [`ConfigError`].
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.download_delay_ms == Some(0) {
            return Err(ConfigError::ZeroDelay);
        }

        if config.junk_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::EmptyPattern { kind: "Junk" });
        }

        let mut seen = HashSet::new();
        for category in &config.categories {
            Self::validate_category(category)?;

            if !seen.insert(category.name.as_str()) {
                return Err(ConfigError::DuplicateCategory(category.name.clone()));
            }
        }

        Ok(())
    }

    fn validate_category(category: &CategoryConfig) -> Result<(), ConfigError> {
        let name = category.name.as_str();
        let invalid = |reason| ConfigError::InvalidCategoryName {
            name: name.to_string(),
            reason,
        };

        if name.trim().is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if name.contains(['/', '\\']) {
            return Err(invalid("name cannot contain path separators"));
        }
        if name == "raw" || name.starts_with('.') {
            return Err(invalid("name is reserved"));
        }

        if category.archive_glob.trim().is_empty() {
            return Err(ConfigError::EmptyPattern { kind: "Archive" });
        }

        if category.exclude_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::EmptyPattern { kind: "Exclude" });
        }

        if let Some(idx) = category
            .normalize
            .words
            .words()
            .iter()
            .position(String::is_empty)
        {
            return Err(ConfigError::EmptyPhrase {
                category: name.to_string(),
                position: idx + 1,
            });
        }

        if category
            .normalize
            .options
            .exclude_markers
            .iter()
            .any(String::is_empty)
        {
            return Err(ConfigError::EmptyMarker {
                category: name.to_string(),
            });
        }

        Ok(())
    }
}
