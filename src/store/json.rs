//! JSON file project store.
//!
//! Each project is one JSON document:
//!
//! ```json
//! {
//!   "name": "Root",
//!   "modules": [{ "name": "Main", "kind": "standard_code", "code": "..." }],
//!   "references": [{ "name": "Utils", "identifier": "*\\Autils.json" }]
//! }
//! ```
//!
//! Relative locators resolve against the store's base directory when one
//! is set, otherwise against the working directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::types::Project;
use super::{ProjectStore, StoreError};

/// Store reading and writing project documents on the file system.
#[derive(Debug, Clone, Default)]
pub struct JsonFileStore {
    base_dir: Option<PathBuf>,
}

impl JsonFileStore {
    /// Store resolving relative locators against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store resolving relative locators against `dir`.
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    /// Resolve a locator to a file path.
    pub fn path_for(&self, locator: &str) -> PathBuf {
        let path = Path::new(locator);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ProjectStore for JsonFileStore {
    fn load(&self, locator: &str) -> Result<Project, StoreError> {
        let path = self.path_for(locator);
        debug!(locator = %locator, path = %path.display(), "Loading project");

        let bytes = std::fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(path.display().to_string())
            } else {
                StoreError::Io {
                    locator: locator.to_string(),
                    source,
                }
            }
        })?;

        let project: Project = serde_json::from_slice(&bytes).map_err(|source| StoreError::Format {
            locator: locator.to_string(),
            source,
        })?;

        info!(project = %project.name, path = %path.display(), modules = project.num_modules(), "Loaded project");
        Ok(project)
    }

    fn save(&mut self, project: &Project, destination: &str) -> Result<(), StoreError> {
        let path = self.path_for(destination);
        let bytes = serde_json::to_vec_pretty(project).map_err(|source| StoreError::Format {
            locator: destination.to_string(),
            source,
        })?;

        std::fs::write(&path, bytes).map_err(|source| StoreError::Io {
            locator: destination.to_string(),
            source,
        })?;

        info!(project = %project.name, path = %path.display(), "Saved project");
        Ok(())
    }
}
