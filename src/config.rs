//! Bundler configuration.
//!
//! Options load from a TOML file; missing keys take their defaults.
//!
//! ```toml
//! recurse_references = true
//! always_use_source = false
//! only_merge_used = true
//! detect_cycles = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::policy::{AlwaysUseSource, ConflictResolver, InteractiveResolver};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        /// Path of the config file.
        path: String,
        /// Underlying failure.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for these options.
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Options recognised by the bundler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleOptions {
    /// Resolve each dependency's own project references before merging it.
    pub recurse_references: bool,
    /// Settle every conflict in favour of the dependency without asking.
    pub always_use_source: bool,
    /// Only merge dependency modules that some other module mentions.
    pub only_merge_used: bool,
    /// Fail with a cycle error instead of recursing forever.
    pub detect_cycles: bool,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            recurse_references: true,
            always_use_source: false,
            only_merge_used: true,
            detect_cycles: false,
        }
    }
}

impl BundleOptions {
    /// Parse options from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// The conflict policy these options select.
    ///
    /// `always_use_source` picks the automatic policy. Otherwise conflicts
    /// are asked on the terminal, or fail when there is none.
    pub fn resolver(&self) -> Box<dyn ConflictResolver> {
        if self.always_use_source {
            Box::new(AlwaysUseSource)
        } else {
            Box::new(InteractiveResolver::from_terminal())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = BundleOptions::default();
        assert!(opts.recurse_references);
        assert!(!opts.always_use_source);
        assert!(opts.only_merge_used);
        assert!(!opts.detect_cycles);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let opts = BundleOptions::from_toml_str("always_use_source = true\n").unwrap();
        assert!(opts.always_use_source);
        assert!(opts.recurse_references);
        assert!(opts.only_merge_used);
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            BundleOptions::from_toml_str("only_merge_used = \"maybe\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundler.toml");
        std::fs::write(&path, "recurse_references = false\ndetect_cycles = true\n").unwrap();

        let opts = BundleOptions::load(&path).unwrap();
        assert!(!opts.recurse_references);
        assert!(opts.detect_cycles);
    }

    #[test]
    fn test_resolver_selection() {
        let opts = BundleOptions {
            always_use_source: true,
            ..BundleOptions::default()
        };
        assert_eq!(opts.resolver().name(), "always_use_source");
    }
}
