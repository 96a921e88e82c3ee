//! Automatic policy: the dependency's copy always wins.

use tracing::info;

use super::{ConflictError, ConflictResolver, ModuleConflict, Resolution};

/// Resolves every conflict in favour of the source without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysUseSource;

impl ConflictResolver for AlwaysUseSource {
    fn resolve(&mut self, conflict: &ModuleConflict) -> Result<Resolution, ConflictError> {
        info!(
            target_project = %conflict.target_project,
            source_project = %conflict.source_project,
            module = %conflict.module,
            "Conflict resolved in favour of source"
        );
        Ok(Resolution::PreferSource)
    }

    fn name(&self) -> &'static str {
        "always_use_source"
    }
}
