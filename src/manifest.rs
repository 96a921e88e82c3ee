//! Bundle manifest: what one top-level resolution did.
//!
//! The manifest lists every dependency merged (in merge order), every
//! conflict decision, every pruned module and a fingerprint of the result,
//! so a bundle can be checked against a later run of the same inputs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::BundleOptions;
use crate::fingerprint::{code_digest, project_fingerprint};
use crate::policy::ResolvedConflict;
use crate::types::Project;
use crate::BUNDLE_SCHEMA_VERSION;

/// One dependency folded into one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStep {
    /// Display name of the satisfied reference.
    pub dependency: String,
    /// Locator the dependency was loaded from.
    pub locator: String,
    /// Name of the project merged into.
    pub target: String,
    /// Recursion depth; 0 for the root's own references.
    pub depth: usize,
    /// Size of the target's module set after the merge.
    pub module_count: usize,
    /// External references appended to the target.
    pub references_added: usize,
    /// Conflicts decided during this merge.
    pub conflicts: Vec<ResolvedConflict>,
    /// Dependency modules pruned as unused.
    pub pruned: Vec<String>,
    /// Dependency modules dropped as exact duplicates.
    pub duplicates: Vec<String>,
}

/// Summary of a completed bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Schema version.
    pub version: String,
    /// Root project name.
    pub project: String,
    /// When the bundle completed.
    pub bundled_at: DateTime<Utc>,
    /// Options in effect.
    pub options: BundleOptions,
    /// Conflict policy in effect.
    pub resolver: String,
    /// Merge steps, innermost dependencies first.
    pub steps: Vec<MergeStep>,
    /// Final module count.
    pub module_count: usize,
    /// Final reference count.
    pub reference_count: usize,
    /// Fingerprint of the bundled project.
    pub fingerprint: String,
    /// SHA-256 of each final module's code, by module name.
    pub module_digests: BTreeMap<String, String>,
}

impl BundleManifest {
    /// Build the manifest for a fully resolved project.
    pub fn new(
        project: &Project,
        options: BundleOptions,
        resolver: &str,
        steps: Vec<MergeStep>,
    ) -> Self {
        let module_digests = project
            .modules()
            .iter()
            .map(|m| (m.name.clone(), code_digest(&m.code)))
            .collect();

        Self {
            version: BUNDLE_SCHEMA_VERSION.to_string(),
            project: project.name.clone(),
            bundled_at: Utc::now(),
            options,
            resolver: resolver.to_string(),
            steps,
            module_count: project.num_modules(),
            reference_count: project.references().len(),
            fingerprint: project_fingerprint(project),
            module_digests,
        }
    }

    /// All conflict decisions across every step.
    pub fn conflicts(&self) -> impl Iterator<Item = &ResolvedConflict> {
        self.steps.iter().flat_map(|s| s.conflicts.iter())
    }

    /// Total modules pruned across every step.
    pub fn pruned_count(&self) -> usize {
        self.steps.iter().map(|s| s.pruned.len()).sum()
    }

    /// Locators merged, in merge order.
    pub fn merged_locators(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.locator.as_str()).collect()
    }
}
