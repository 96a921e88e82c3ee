//! Dependency references.
//!
//! A reference's kind is never stored: it is read off the identifier's
//! encoding. Identifiers that begin with [`PROJECT_REFERENCE_MARKER`] point
//! at another mergeable project and the remainder of the string is its
//! locator. Everything else is an opaque external library.

use serde::{Deserialize, Serialize};

/// Scheme prefix carried by every project-kind identifier.
pub const PROJECT_REFERENCE_MARKER: &str = "*\\A";

/// Classification of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    /// Another mergeable project.
    Project,
    /// Opaque library dependency.
    External,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project => write!(f, "project"),
            Self::External => write!(f, "external"),
        }
    }
}

/// A dependency entry in a project's reference list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// Display identifier.
    pub name: String,
    /// Opaque identifier encoding a project locator or an external library.
    pub identifier: String,
}

impl Reference {
    /// Create a new reference.
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
        }
    }

    /// Create a project-kind reference pointing at `locator`.
    pub fn project(name: impl Into<String>, locator: &str) -> Self {
        Self::new(name, format!("{PROJECT_REFERENCE_MARKER}{locator}"))
    }

    /// Classify this reference by its identifier's marker.
    pub fn kind(&self) -> ReferenceKind {
        if self.identifier.starts_with(PROJECT_REFERENCE_MARKER) {
            ReferenceKind::Project
        } else {
            ReferenceKind::External
        }
    }

    /// Whether this reference points at another project.
    pub fn is_project(&self) -> bool {
        self.kind() == ReferenceKind::Project
    }

    /// Identity comparison used for deduplication.
    ///
    /// Two references are the same dependency when both `identifier` and
    /// `name` match ignoring case.
    pub fn same_identity(&self, other: &Reference) -> bool {
        self.identifier.to_lowercase() == other.identifier.to_lowercase()
            && self.name.to_lowercase() == other.name.to_lowercase()
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.identifier)
    }
}
