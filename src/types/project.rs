//! Project: the unit of merge.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::module::Module;
use super::reference::Reference;

/// A named bundle of code modules and dependency references.
///
/// Module names are unique within a project. The module list is ordered;
/// order carries no meaning beyond reproducible output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProject")]
pub struct Project {
    /// Project name. Also the textual qualifier used in code (`Name.Member`).
    pub name: String,
    /// Modules in this project.
    #[serde(default)]
    modules: Vec<Module>,
    /// Dependency list, in declaration order.
    #[serde(default)]
    references: Vec<Reference>,
}

/// A deserialized project that breaks the uniqueness rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidProjectError {
    /// Two modules share a name.
    #[error("Project \"{project}\" has more than one module named \"{module}\"")]
    DuplicateModule {
        /// Project name.
        project: String,
        /// Repeated module name.
        module: String,
    },

    /// Two references share an identity.
    #[error("Project \"{project}\" lists reference \"{reference}\" more than once")]
    DuplicateReference {
        /// Project name.
        project: String,
        /// Display name of the repeated reference.
        reference: String,
    },
}

/// Wire shape of [`Project`], checked before it becomes one.
#[derive(Deserialize)]
struct RawProject {
    name: String,
    #[serde(default)]
    modules: Vec<Module>,
    #[serde(default)]
    references: Vec<Reference>,
}

impl TryFrom<RawProject> for Project {
    type Error = InvalidProjectError;

    fn try_from(raw: RawProject) -> Result<Self, Self::Error> {
        let mut names = HashSet::with_capacity(raw.modules.len());
        if let Some(dup) = raw.modules.iter().find(|m| !names.insert(m.name.as_str())) {
            return Err(InvalidProjectError::DuplicateModule {
                project: raw.name,
                module: dup.name.clone(),
            });
        }

        for (idx, reference) in raw.references.iter().enumerate() {
            if raw.references[..idx].iter().any(|r| r.same_identity(reference)) {
                return Err(InvalidProjectError::DuplicateReference {
                    project: raw.name,
                    reference: reference.name.clone(),
                });
            }
        }

        Ok(Self {
            name: raw.name,
            modules: raw.modules,
            references: raw.references,
        })
    }
}

impl Project {
    /// Create an empty project.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modules: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Add a module, replacing any existing module of the same name.
    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.retain(|m| m.name != module.name);
        self.modules.push(module);
        self
    }

    /// Add a reference unless one with the same identity is already present.
    pub fn with_reference(mut self, reference: Reference) -> Self {
        if !self.references.iter().any(|r| r.same_identity(&reference)) {
            self.references.push(reference);
        }
        self
    }

    /// All modules, in order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Look up a module by name.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Replace the module set wholesale with the output of a merge.
    pub fn set_modules(&mut self, modules: Vec<Module>) {
        debug_assert!(
            {
                let mut names: Vec<&str> = modules.iter().map(|m| m.name.as_str()).collect();
                names.sort_unstable();
                names.windows(2).all(|w| w[0] != w[1])
            },
            "module names must be unique"
        );
        self.modules = modules;
    }

    /// All references, in order.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Mutable access to the reference list.
    pub(crate) fn references_mut(&mut self) -> &mut Vec<Reference> {
        &mut self.references
    }

    /// Remove the entry sharing `reference`'s identity. Returns whether one was removed.
    pub fn remove_reference(&mut self, reference: &Reference) -> bool {
        match self.references.iter().position(|r| r.same_identity(reference)) {
            Some(idx) => {
                self.references.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Whether any project-kind reference remains.
    pub fn has_project_references(&self) -> bool {
        self.references.iter().any(Reference::is_project)
    }

    /// Number of modules.
    pub fn num_modules(&self) -> usize {
        self.modules.len()
    }
}
