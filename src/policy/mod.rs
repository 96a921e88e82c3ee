//! Conflict resolution policies.
//!
//! A conflict is two modules sharing a name but differing in code. The
//! reconciler hands each one to a [`ConflictResolver`] and applies whatever
//! it decides; it never embeds a policy of its own.

pub mod automatic;
pub mod interactive;

use serde::{Deserialize, Serialize};

use crate::types::ModuleKind;

pub use automatic::AlwaysUseSource;
pub use interactive::{FnPrompt, InteractiveResolver, PromptChannel, StdioPrompt, TerminalPrompt};

/// A same-name, different-code collision between two projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConflict {
    /// Project being merged into.
    pub target_project: String,
    /// Dependency project being merged in.
    pub source_project: String,
    /// Kind of the target's module.
    pub kind: ModuleKind,
    /// Shared module name.
    pub module: String,
}

impl std::fmt::Display for ModuleConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "The source \"{}\" and target \"{}\" have a {} with the same name \"{}\" and different code",
            self.source_project, self.target_project, self.kind, self.module
        )
    }
}

/// Decision for a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Keep the source's module, drop the target's copy.
    PreferSource,
    /// Keep the target's module, drop the source's copy.
    PreferTarget,
}

/// A conflict together with the decision taken for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConflict {
    /// The collision.
    #[serde(flatten)]
    pub conflict: ModuleConflict,
    /// The decision applied.
    pub resolution: Resolution,
}

/// Error type for conflict resolution.
#[derive(Debug, thiserror::Error)]
pub enum ConflictError {
    /// No decision channel exists to settle the conflict.
    #[error("{0}. Please remove it from one or the other and run again.")]
    Unresolvable(ModuleConflict),

    /// The decision channel failed while asking.
    #[error("Failed to read a decision for module \"{module}\": {source}")]
    Prompt {
        /// Module being asked about.
        module: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

/// Capability that settles module conflicts.
pub trait ConflictResolver {
    /// Decide which copy of a conflicting module survives.
    fn resolve(&mut self, conflict: &ModuleConflict) -> Result<Resolution, ConflictError>;

    /// Short policy name for reports.
    fn name(&self) -> &'static str;
}

impl<R: ConflictResolver + ?Sized> ConflictResolver for Box<R> {
    fn resolve(&mut self, conflict: &ModuleConflict) -> Result<Resolution, ConflictError> {
        (**self).resolve(conflict)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conflict() -> ModuleConflict {
        ModuleConflict {
            target_project: "Target".to_string(),
            source_project: "Source".to_string(),
            kind: ModuleKind::ClassCode,
            module: "Logger".to_string(),
        }
    }

    #[test]
    fn test_unresolvable_message_names_everything() {
        let msg = ConflictError::Unresolvable(conflict()).to_string();
        assert!(msg.contains("\"Source\""));
        assert!(msg.contains("\"Target\""));
        assert!(msg.contains("class module"));
        assert!(msg.contains("\"Logger\""));
        assert!(msg.contains("remove it from one or the other"));
    }

    #[test]
    fn test_boxed_resolver_delegates() {
        let mut boxed: Box<dyn ConflictResolver> = Box::new(AlwaysUseSource);
        assert_eq!(boxed.resolve(&conflict()).unwrap(), Resolution::PreferSource);
        assert_eq!(boxed.name(), "always_use_source");
    }
}
