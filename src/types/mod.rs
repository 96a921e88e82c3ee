//! Core types for the module bundler.

pub mod module;
pub mod reference;
pub mod project;

pub use module::{Module, ModuleKind};
pub use reference::{Reference, ReferenceKind, PROJECT_REFERENCE_MARKER};
pub use project::{InvalidProjectError, Project};
