use super::Candy;
use crate::error::Result;
use crate::models::{BuildFile, NodeId};
use crate::store::ManifestStore;

impl<S: ManifestStore> Candy<S> {
    /// Add `file` to the main target's compile-sources phase.
    ///
    /// Returns `Ok(None)` when the target has no sources phase. Adding a file
    /// that is already a member returns the existing entry.
    pub fn add_build_phase(&mut self, file: NodeId) -> Result<Option<BuildFile>> {
        let target = self.main_target_mut()?;
        let target_name = target.name.clone();

        let Some(phase) = target.sources_build_phase_mut() else {
            tracing::debug!("Target {} has no sources build phase", target_name);
            return Ok(None);
        };

        let build_file = phase.add_file(file);
        tracing::info!("Added {} to sources of {}", file, target_name);
        Ok(Some(build_file))
    }
}
