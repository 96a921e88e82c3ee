//! Reference handling: classification, dependency location and set union.

use tracing::{debug, info};

use crate::types::{Project, Reference, PROJECT_REFERENCE_MARKER};

/// A project-kind identifier too short to carry a locator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed project reference \"{name}\": identifier \"{identifier}\" is shorter than the {prefix_len}-character scheme prefix")]
pub struct MalformedReferenceError {
    /// Display name of the offending reference.
    pub name: String,
    /// The identifier that could not be decoded.
    pub identifier: String,
    /// Length of the scheme prefix that should have been stripped.
    pub prefix_len: usize,
}

/// A reference list split by kind, each half in original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedReferences {
    /// References to other mergeable projects.
    pub project: Vec<Reference>,
    /// Opaque library references.
    pub external: Vec<Reference>,
}

/// Partition a project's references into project-kind and external-kind.
pub fn classify(project: &Project) -> ClassifiedReferences {
    let (projects, external): (Vec<Reference>, Vec<Reference>) = project
        .references()
        .iter()
        .cloned()
        .partition(Reference::is_project);

    if projects.is_empty() {
        info!(project = %project.name, "No project references found");
    } else {
        info!(
            project = %project.name,
            references = ?projects.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            "Found project references"
        );
    }

    ClassifiedReferences {
        project: projects,
        external,
    }
}

/// Derive the loadable locator of a project-kind reference.
///
/// Strips the fixed-length scheme prefix from the identifier.
pub fn locate(reference: &Reference) -> Result<String, MalformedReferenceError> {
    let prefix_len = PROJECT_REFERENCE_MARKER.len();
    let locator = reference
        .identifier
        .get(prefix_len..)
        .ok_or_else(|| MalformedReferenceError {
            name: reference.name.clone(),
            identifier: reference.identifier.clone(),
            prefix_len,
        })?;

    debug!(reference = %reference.name, locator = %locator, "Located reference");
    Ok(locator.to_string())
}

/// Merge `incoming` into `target`'s reference list.
///
/// Project-kind entries are skipped: those are satisfied by recursive
/// resolution, never propagated as raw references. Entries whose identity
/// already exists are skipped. Returns the number of references appended.
pub fn union(target: &mut Project, incoming: &[Reference]) -> usize {
    let target_name = target.name.clone();
    let references = target.references_mut();
    let mut added = 0;

    for reference in incoming {
        if reference.is_project() {
            continue;
        }
        if references.iter().any(|r| r.same_identity(reference)) {
            continue;
        }
        debug!(project = %target_name, reference = %reference.name, "Adding external reference");
        references.push(reference.clone());
        added += 1;
    }

    added
}
