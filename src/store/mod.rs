//! Project storage backends.
//!
//! The bundler only ever loads dependencies; saving is for the caller once
//! the top-level resolution returns.

pub mod memory;
pub mod json;

use crate::types::Project;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Nothing exists at the locator.
    #[error("Project not found: {0}")]
    NotFound(String),

    /// Reading or writing the project failed.
    #[error("I/O error for \"{locator}\": {source}")]
    Io {
        /// Locator or destination involved.
        locator: String,
        /// Underlying failure.
        source: std::io::Error,
    },

    /// The stored document is not a valid project: malformed JSON, an
    /// unknown module kind, or repeated module names or references.
    #[error("Invalid project document \"{locator}\": {source}")]
    Format {
        /// Locator of the bad document.
        locator: String,
        /// Underlying parse failure.
        source: serde_json::Error,
    },
}

/// Trait for project storage backends.
pub trait ProjectStore {
    /// Load the project at `locator`.
    fn load(&self, locator: &str) -> Result<Project, StoreError>;

    /// Persist `project` at `destination`.
    fn save(&mut self, project: &Project, destination: &str) -> Result<(), StoreError>;
}

pub use memory::InMemoryProjectStore;
pub use json::JsonFileStore;
