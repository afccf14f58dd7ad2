//! Persistence of [`Manifest`]s.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CandyError, Result};
use crate::models::Manifest;

/// File holding the object graph inside a manifest location.
pub const MANIFEST_FILE: &str = "project.json";

/// Loads and saves manifests at a location.
///
/// A location is a directory (typically a `*.xcodeproj` container); the store
/// decides which file(s) inside it hold the manifest.
pub trait ManifestStore {
    fn load(&self, location: &Path) -> Result<Manifest>;

    /// Persist `manifest` at `location`.
    ///
    /// With `overwrite == false` this must fail with
    /// [`CandyError::WriteConflict`] rather than replace an existing manifest.
    fn save(&self, manifest: &Manifest, location: &Path, overwrite: bool) -> Result<()>;
}

/// Stores the manifest as pretty-printed JSON in `<location>/project.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStore;

impl JsonStore {
    pub fn manifest_file(location: &Path) -> PathBuf {
        location.join(MANIFEST_FILE)
    }
}

impl ManifestStore for JsonStore {
    fn load(&self, location: &Path) -> Result<Manifest> {
        let file = Self::manifest_file(location);
        tracing::debug!("Loading manifest from {}", file.display());

        let content = fs::read_to_string(&file)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    fn save(&self, manifest: &Manifest, location: &Path, overwrite: bool) -> Result<()> {
        let file = Self::manifest_file(location);
        if !overwrite && file.exists() {
            return Err(CandyError::WriteConflict(file));
        }

        fs::create_dir_all(location)?;
        let mut content = serde_json::to_string_pretty(manifest)?;
        content.push('\n');
        fs::write(&file, content)?;

        tracing::info!("Wrote manifest to {}", file.display());
        Ok(())
    }
}
