//! Bundle orchestration.
//!
//! The bundler walks a project's project-kind references depth-first. For
//! each one it loads the dependency, resolves the dependency's own project
//! references first (when recursion is on), folds its modules into the
//! current project, unions in its external references and finally drops the
//! now-satisfied reference.
//!
//! ## Algorithm
//!
//! 1. Classify the project's references
//! 2. Snapshot the project-kind half; the live list is mutated below
//! 3. For each snapshotted reference, in order:
//!    - locate and load the dependency
//!    - if recursing and it has project references, resolve it in place
//!    - reconcile its modules into the project
//!    - union its external references into the project
//!    - remove the reference
//!
//! Any failure aborts the whole walk. A project is only touched after its
//! merge step has fully succeeded.
//!
//! ## Cycles
//!
//! Without `detect_cycles`, a dependency cycle recurses until the stack is
//! exhausted. With it, recursing into a locator already being resolved fails
//! with [`BundleError::CyclicDependency`]. Cycles only matter when recursing:
//! with `recurse_references` off the walk is one level deep and always ends.

use tracing::{info, info_span, warn};

use crate::config::BundleOptions;
use crate::manifest::{BundleManifest, MergeStep};
use crate::policy::{ConflictError, ConflictResolver};
use crate::reconciler::ModuleReconciler;
use crate::references::{classify, locate, union, MalformedReferenceError};
use crate::store::{ProjectStore, StoreError};
use crate::types::{Project, Reference};

/// Error type for bundling. Every variant aborts the whole resolution.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// A dependency could not be loaded.
    #[error("Failed to load dependency \"{reference}\": {source}")]
    Load {
        /// Display name of the reference being satisfied.
        reference: String,
        /// Underlying store failure.
        source: StoreError,
    },

    /// The root project could not be loaded or the result not saved.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A project reference carries no usable locator.
    #[error(transparent)]
    MalformedReference(#[from] MalformedReferenceError),

    /// A module conflict could not be settled.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// A dependency transitively references itself.
    #[error("Cyclic project dependency: {}", chain.join(" -> "))]
    CyclicDependency {
        /// Locators from the outermost in-progress dependency to the repeat.
        chain: Vec<String>,
    },
}

/// Drives the recursive merge of project dependencies.
pub struct ModuleBundler<S: ProjectStore> {
    store: S,
    options: BundleOptions,
    reconciler: ModuleReconciler,
    resolver: Box<dyn ConflictResolver>,
}

impl<S: ProjectStore> ModuleBundler<S> {
    /// Create a bundler using the conflict policy `options` selects.
    pub fn new(store: S, options: BundleOptions) -> Self {
        Self::build(store, options, options.resolver())
    }

    /// Create a bundler with an explicit conflict policy.
    ///
    /// `options.always_use_source` is ignored; `resolver` decides every conflict.
    pub fn with_policy(store: S, options: BundleOptions, resolver: impl ConflictResolver + 'static) -> Self {
        Self::build(store, options, Box::new(resolver))
    }

    fn build(store: S, options: BundleOptions, resolver: Box<dyn ConflictResolver>) -> Self {
        Self {
            store,
            options,
            reconciler: ModuleReconciler::new(options.only_merge_used),
            resolver,
        }
    }

    /// Replace the conflict policy.
    pub fn with_resolver(mut self, resolver: impl ConflictResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Resolve every project reference of `project` in place.
    ///
    /// Returns the merge steps taken, innermost first.
    pub fn resolve(&mut self, project: &mut Project) -> Result<Vec<MergeStep>, BundleError> {
        let mut steps = Vec::new();
        let mut in_progress = Vec::new();
        self.resolve_at(project, 0, &mut in_progress, &mut steps)?;
        Ok(steps)
    }

    /// Resolve `project` in place and summarise the result.
    pub fn bundle(&mut self, project: &mut Project) -> Result<BundleManifest, BundleError> {
        let steps = self.resolve(project)?;
        Ok(self.manifest(project, steps))
    }

    /// Load the project at `locator`, resolve it and summarise the result.
    ///
    /// The root's locator takes part in cycle detection.
    pub fn bundle_locator(&mut self, locator: &str) -> Result<(Project, BundleManifest), BundleError> {
        let mut project = self.store.load(locator)?;
        let mut steps = Vec::new();
        let mut in_progress = vec![locator.to_string()];
        self.resolve_at(&mut project, 0, &mut in_progress, &mut steps)?;
        let manifest = self.manifest(&project, steps);
        Ok((project, manifest))
    }

    /// The options in effect.
    pub fn options(&self) -> &BundleOptions {
        &self.options
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a mutable reference to the store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn manifest(&self, project: &Project, steps: Vec<MergeStep>) -> BundleManifest {
        let manifest = BundleManifest::new(project, self.options, self.resolver.name(), steps);
        info!(
            project = %manifest.project,
            steps = manifest.steps.len(),
            modules = manifest.module_count,
            fingerprint = %manifest.fingerprint,
            "Bundle complete"
        );
        manifest
    }

    fn resolve_at(
        &mut self,
        project: &mut Project,
        depth: usize,
        in_progress: &mut Vec<String>,
        steps: &mut Vec<MergeStep>,
    ) -> Result<(), BundleError> {
        let _span = info_span!("resolve", project = %project.name, depth).entered();

        // Owned copy: the project's own list shrinks as references are satisfied.
        let pending: Vec<Reference> = classify(project).project;

        for reference in &pending {
            let locator = locate(reference)?;

            let mut dependency = self.store.load(&locator).map_err(|source| BundleError::Load {
                reference: reference.name.clone(),
                source,
            })?;

            if self.options.recurse_references && dependency.has_project_references() {
                if self.options.detect_cycles && in_progress.contains(&locator) {
                    let mut chain = in_progress.clone();
                    chain.push(locator);
                    warn!(chain = ?chain, "Dependency cycle detected");
                    return Err(BundleError::CyclicDependency { chain });
                }

                info!(dependency = %reference.name, locator = %locator, "Recursing references");
                in_progress.push(locator.clone());
                self.resolve_at(&mut dependency, depth + 1, in_progress, steps)?;
                in_progress.pop();
            }

            let outcome = self
                .reconciler
                .reconcile(&dependency, project, self.resolver.as_mut())?;

            project.set_modules(outcome.modules);
            let references_added = union(project, dependency.references());
            project.remove_reference(reference);

            info!(
                project = %project.name,
                dependency = %reference.name,
                modules = project.num_modules(),
                references_added,
                "Removed satisfied reference"
            );

            steps.push(MergeStep {
                dependency: reference.name.clone(),
                locator,
                target: project.name.clone(),
                depth,
                module_count: project.num_modules(),
                references_added,
                conflicts: outcome.conflicts,
                pruned: outcome.pruned,
                duplicates: outcome.duplicates,
            });
        }

        Ok(())
    }
}
