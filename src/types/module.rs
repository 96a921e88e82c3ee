//! Module types for the bundler.

use serde::{Deserialize, Serialize};

/// Kind of code module in a project.
///
/// Serialized as `standard_code`, `class_code` or `form_code`. Documents may
/// also use the short names accepted by [`ModuleKind::from_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ModuleKind {
    /// Plain procedural code module.
    StandardCode,
    /// Class module.
    ClassCode,
    /// Host-bound UI code. Never contributed by a dependency.
    FormCode,
}

impl ModuleKind {
    /// Parse module kind from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" | "standard_code" | "module" => Some(Self::StandardCode),
            "class" | "class_code" => Some(Self::ClassCode),
            "form" | "form_code" | "designer" => Some(Self::FormCode),
            _ => None,
        }
    }

    /// Whether modules of this kind may be pulled in from a dependency.
    pub fn is_mergeable(&self) -> bool {
        !matches!(self, Self::FormCode)
    }
}

impl TryFrom<String> for ModuleKind {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_str(&s).ok_or_else(|| format!("unknown module kind \"{s}\""))
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StandardCode => write!(f, "standard module"),
            Self::ClassCode => write!(f, "class module"),
            Self::FormCode => write!(f, "form"),
        }
    }
}

/// A named unit of source code within a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Module {
    /// Module name, unique within its owning project.
    pub name: String,
    /// Kind of module.
    pub kind: ModuleKind,
    /// Raw text body.
    pub code: String,
}

impl Module {
    /// Create a new module.
    pub fn new(name: impl Into<String>, kind: ModuleKind, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            code: code.into(),
        }
    }

    /// Create a standard code module.
    pub fn standard(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self::new(name, ModuleKind::StandardCode, code)
    }

    /// Create a class module.
    pub fn class(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self::new(name, ModuleKind::ClassCode, code)
    }

    /// Create a form module.
    pub fn form(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self::new(name, ModuleKind::FormCode, code)
    }

    /// Whether this module's code contains `name` as a substring.
    pub fn mentions(&self, name: &str) -> bool {
        self.code.contains(name)
    }
}
