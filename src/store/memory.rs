//! In-memory project store for testing.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::types::Project;
use super::{ProjectStore, StoreError};

/// In-memory project store keyed by locator.
///
/// Records every load so tests can assert on the dependency walk.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectStore {
    projects: BTreeMap<String, Project>,
    loads: RefCell<Vec<String>>,
}

impl InMemoryProjectStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project at `locator`.
    pub fn insert(&mut self, locator: impl Into<String>, project: Project) {
        self.projects.insert(locator.into(), project);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_project(mut self, locator: impl Into<String>, project: Project) -> Self {
        self.insert(locator, project);
        self
    }

    /// Get the project stored at `locator`.
    pub fn get(&self, locator: &str) -> Option<&Project> {
        self.projects.get(locator)
    }

    /// Locators loaded so far, in load order.
    pub fn loads(&self) -> Vec<String> {
        self.loads.borrow().clone()
    }

    /// Number of stored projects.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl ProjectStore for InMemoryProjectStore {
    fn load(&self, locator: &str) -> Result<Project, StoreError> {
        self.loads.borrow_mut().push(locator.to_string());
        self.projects
            .get(locator)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(locator.to_string()))
    }

    fn save(&mut self, project: &Project, destination: &str) -> Result<(), StoreError> {
        self.projects.insert(destination.to_string(), project.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Module;

    #[test]
    fn test_load_and_save() {
        let mut store = InMemoryProjectStore::new()
            .with_project("a", Project::new("A").with_module(Module::standard("M", "x")));

        let loaded = store.load("a").unwrap();
        assert_eq!(loaded.name, "A");

        store.save(&loaded, "b").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.loads(), vec!["a".to_string()]);
    }

    #[test]
    fn test_missing_is_not_found() {
        let store = InMemoryProjectStore::new();
        assert!(matches!(store.load("nope"), Err(StoreError::NotFound(l)) if l == "nope"));
    }
}
