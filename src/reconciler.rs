//! Module reconciliation.
//!
//! Folds a source project's modules into a target project's modules,
//! producing the merged set and reporting every decision taken on the way.
//!
//! ## Algorithm
//!
//! 1. Source candidates are the source's standard and class modules. Forms
//!    are never pulled in from a dependency. Target candidates are all of
//!    the target's modules.
//! 2. With `only_merge_used`, a source candidate is pruned when no *other*
//!    candidate (source or target) mentions its name. This is one pass over
//!    the original codes, not a reachability closure: a module mentioned
//!    only by a pruned module survives.
//! 3. Target code loses every `Source.` and `Target.` qualifier. Removal is
//!    plain text replacement.
//! 4. A source module identical in name and code to a target module is
//!    dropped; the target copy is authoritative.
//! 5. Same name with different code goes to the [`ConflictResolver`].
//! 6. Merged set is surviving targets followed by surviving sources.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::policy::{ConflictError, ConflictResolver, ModuleConflict, Resolution, ResolvedConflict};
use crate::types::{Module, Project};

/// Result of folding one project into another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Merged module set: target survivors, then source survivors.
    pub modules: Vec<Module>,
    /// Conflicts settled by the resolver.
    pub conflicts: Vec<ResolvedConflict>,
    /// Source modules dropped because nothing mentions them.
    pub pruned: Vec<String>,
    /// Source modules dropped as exact duplicates of a target module.
    pub duplicates: Vec<String>,
}

/// Computes merged module sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleReconciler {
    only_merge_used: bool,
}

impl ModuleReconciler {
    /// Create a reconciler. `only_merge_used` enables unused-module pruning.
    pub fn new(only_merge_used: bool) -> Self {
        Self { only_merge_used }
    }

    /// Whether unused-module pruning is enabled.
    pub fn only_merge_used(&self) -> bool {
        self.only_merge_used
    }

    /// Merge `source`'s modules into `target`'s.
    ///
    /// Neither project is modified; the caller installs the result. On error
    /// nothing has been applied anywhere.
    pub fn reconcile(
        &self,
        source: &Project,
        target: &Project,
        resolver: &mut dyn ConflictResolver,
    ) -> Result<MergeOutcome, ConflictError> {
        let source_items: Vec<Module> = source
            .modules()
            .iter()
            .filter(|m| m.kind.is_mergeable())
            .cloned()
            .collect();
        let mut target_items: Vec<Module> = target.modules().to_vec();

        let mut drop_source: BTreeSet<usize> = BTreeSet::new();
        let mut drop_target: BTreeSet<usize> = BTreeSet::new();
        let mut outcome = MergeOutcome::default();

        if self.only_merge_used {
            for (idx, item) in source_items.iter().enumerate() {
                if !self.is_mentioned(idx, item, &source_items, &target_items) {
                    drop_source.insert(idx);
                    outcome.pruned.push(item.name.clone());
                }
            }
        }

        let qualifiers = qualifiers(source, target);

        for (t_idx, target_item) in target_items.iter_mut().enumerate() {
            for qualifier in &qualifiers {
                if target_item.code.contains(qualifier.as_str()) {
                    target_item.code = target_item.code.replace(qualifier.as_str(), "");
                }
            }

            // Pruned modules are not merged, so they cannot collide.
            let Some(s_idx) = source_items
                .iter()
                .position(|s| s.name == target_item.name)
                .filter(|s_idx| !drop_source.contains(s_idx))
            else {
                continue;
            };

            if source_items[s_idx].code == target_item.code {
                drop_source.insert(s_idx);
                outcome.duplicates.push(target_item.name.clone());
                continue;
            }

            let conflict = ModuleConflict {
                target_project: target.name.clone(),
                source_project: source.name.clone(),
                kind: target_item.kind,
                module: target_item.name.clone(),
            };
            let resolution = resolver.resolve(&conflict)?;
            match resolution {
                Resolution::PreferSource => drop_target.insert(t_idx),
                Resolution::PreferTarget => drop_source.insert(s_idx),
            };
            outcome.conflicts.push(ResolvedConflict { conflict, resolution });
        }

        let kept_targets: Vec<Module> = keep(target_items, &drop_target);
        let kept_sources: Vec<Module> = keep(source_items, &drop_source);

        debug!(
            source = ?names(&kept_sources),
            target = ?names(&kept_targets),
            "Merging source with target"
        );

        outcome.modules = kept_targets.into_iter().chain(kept_sources).collect();

        info!(
            source_project = %source.name,
            target_project = %target.name,
            modules = outcome.modules.len(),
            pruned = outcome.pruned.len(),
            duplicates = outcome.duplicates.len(),
            conflicts = outcome.conflicts.len(),
            "Merge complete"
        );
        debug!(merged = ?names(&outcome.modules), "Merged module set");

        Ok(outcome)
    }

    fn is_mentioned(&self, idx: usize, item: &Module, sources: &[Module], targets: &[Module]) -> bool {
        targets.iter().any(|t| t.mentions(&item.name))
            || sources
                .iter()
                .enumerate()
                .any(|(other, s)| other != idx && s.mentions(&item.name))
    }
}

/// Project-name qualifiers to strip from target code.
fn qualifiers(source: &Project, target: &Project) -> Vec<String> {
    let mut out = Vec::with_capacity(2);
    for name in [&source.name, &target.name] {
        if name.is_empty() {
            continue;
        }
        let qualifier = format!("{name}.");
        if !out.contains(&qualifier) {
            out.push(qualifier);
        }
    }
    out
}

fn keep(items: Vec<Module>, dropped: &BTreeSet<usize>) -> Vec<Module> {
    items
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| !dropped.contains(idx))
        .map(|(_, m)| m)
        .collect()
}

fn names(modules: &[Module]) -> Vec<&str> {
    modules.iter().map(|m| m.name.as_str()).collect()
}
