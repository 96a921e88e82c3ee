//! # module-bundler
//!
//! Folds interdependent code projects into one self-contained project.
//!
//! A project is a named bundle of code modules plus a list of references.
//! Some references point at other projects; the bundler follows those
//! recursively, pulls each dependency's modules into the dependent project,
//! reconciles name collisions and unions in the dependency's external
//! library references. The result carries no project references at all.
//!
//! ## Architecture
//!
//! ```text
//! ModuleBundler → locate → ProjectStore::load
//!       ↓
//!   classify → ModuleReconciler → ConflictResolver
//!       ↓
//!     union → BundleManifest
//! ```
//!
//! ## Guarantees
//!
//! - Module names stay unique after every merge
//! - Forms are never pulled in from a dependency
//! - A failed merge step leaves the project as it was before that step
//! - Every failure aborts the whole resolution

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod references;
pub mod reconciler;
pub mod policy;
pub mod store;
pub mod bundler;
pub mod config;
pub mod fingerprint;
pub mod manifest;

// Re-exports
pub use types::{InvalidProjectError, Module, ModuleKind, Project, Reference, ReferenceKind, PROJECT_REFERENCE_MARKER};
pub use references::{classify, locate, union, ClassifiedReferences, MalformedReferenceError};
pub use reconciler::{MergeOutcome, ModuleReconciler};
pub use policy::{
    AlwaysUseSource, ConflictError, ConflictResolver, FnPrompt, InteractiveResolver,
    ModuleConflict, PromptChannel, Resolution, ResolvedConflict, StdioPrompt, TerminalPrompt,
};
pub use store::{InMemoryProjectStore, JsonFileStore, ProjectStore, StoreError};
pub use bundler::{BundleError, ModuleBundler};
pub use config::{BundleOptions, ConfigError};
pub use fingerprint::{code_digest, project_fingerprint};
pub use manifest::{BundleManifest, MergeStep};

/// Schema version of the bundle manifest.
/// Increment on breaking changes to the manifest layout.
pub const BUNDLE_SCHEMA_VERSION: &str = "bundle_v1";
