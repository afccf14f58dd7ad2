//! The project facade.
//!
//! [`Candy`] opens a manifest, answers the lookups a code generator needs
//! (main target, source groups, resolved paths) and exposes the tree
//! mutations in [`mutate`] and [`membership`]. Nothing reaches disk except
//! the directories and files those mutations create, until [`Candy::write`]
//! is called.
//!
//! A `Candy` is a plain owned value; all mutation goes through `&mut self`,
//! so concurrent edits of one manifest must be serialized by the caller.

mod membership;
mod mutate;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CandyConfig;
use crate::error::{CandyError, Result};
use crate::models::{Manifest, NodeId, ProductType, Target};
use crate::store::{JsonStore, ManifestStore};
use crate::tree::render;

pub struct Candy<S: ManifestStore = JsonStore> {
    path: PathBuf,
    project_root: PathBuf,
    manifest: Manifest,
    config: CandyConfig,
    store: S,
}

impl Candy<JsonStore> {
    /// Open the JSON manifest at `path` with default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, CandyConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: CandyConfig) -> Result<Self> {
        Self::open_with_store(path, config, JsonStore)
    }

    /// Scaffold a new application project named `name` at `path`.
    ///
    /// Creates the source and test folders under the project root and writes
    /// the manifest, failing if one already exists there.
    pub fn create(path: impl AsRef<Path>, name: &str, config: CandyConfig) -> Result<Self> {
        let path = std::path::absolute(path.as_ref())?;
        let project_root = project_root_for(&path, &config.container_marker);

        fs::create_dir_all(project_root.join(name))?;
        fs::create_dir_all(project_root.join(format!("{name}Tests")))?;

        let candy = Self {
            path,
            project_root,
            manifest: Manifest::new_application(name),
            config,
            store: JsonStore,
        };
        candy.write(false)?;

        tracing::info!("Created project {} at {}", name, candy.path.display());
        Ok(candy)
    }
}

impl<S: ManifestStore> Candy<S> {
    pub fn open_with_store(path: impl AsRef<Path>, config: CandyConfig, store: S) -> Result<Self> {
        let path = std::path::absolute(path.as_ref())?;
        let manifest = store.load(&path)?;
        Ok(Self::from_manifest(path, manifest, config, store))
    }

    /// Wrap an already loaded manifest that lives at `path`.
    pub fn from_manifest(path: PathBuf, manifest: Manifest, config: CandyConfig, store: S) -> Self {
        let project_root = project_root_for(&path, &config.container_marker);
        tracing::debug!("Project root: {}", project_root.display());
        Self {
            path,
            project_root,
            manifest,
            config,
            store,
        }
    }

    /// Location the manifest was opened from and is written back to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory all project-relative node paths are anchored at.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn manifest_mut(&mut self) -> &mut Manifest {
        &mut self.manifest
    }

    pub fn config(&self) -> &CandyConfig {
        &self.config
    }

    // ============================================================
    // Targets
    // ============================================================

    pub fn application_targets(&self) -> Vec<&Target> {
        let targets: Vec<&Target> = self
            .manifest
            .targets()
            .iter()
            .filter(|target| target.product_type == ProductType::Application)
            .collect();
        tracing::debug!(
            "Application targets: {:?}",
            targets.iter().map(|t| t.name.as_str()).collect::<Vec<_>>()
        );
        targets
    }

    /// The first application target.
    pub fn main_target(&self) -> Result<&Target> {
        self.application_targets()
            .into_iter()
            .next()
            .ok_or_else(|| CandyError::not_found("applicationTargets"))
    }

    pub(crate) fn main_target_mut(&mut self) -> Result<&mut Target> {
        self.manifest
            .targets_mut()
            .iter_mut()
            .find(|target| target.product_type == ProductType::Application)
            .ok_or_else(|| CandyError::not_found("applicationTargets"))
    }

    // ============================================================
    // Groups and paths
    // ============================================================

    /// Top-level groups that hold real sources.
    ///
    /// These are the main group's folder-backed child groups, minus
    /// structural groups (`Products`, `Frameworks`) and test groups (paths
    /// ending in `Tests`/`UITests`), in navigator order.
    pub fn source_groups(&self) -> Result<Vec<NodeId>> {
        let root_object = self
            .manifest
            .root_object()
            .ok_or_else(|| CandyError::not_found("rootObject"))?;
        let main_group = root_object
            .main_group
            .and_then(|id| self.manifest.node(id))
            .ok_or_else(|| CandyError::not_found("mainGroup"))?;

        let source_groups: Vec<NodeId> = main_group
            .children()
            .iter()
            .filter_map(|id| self.manifest.node(*id))
            .filter(|node| node.is_group())
            .filter(|node| {
                node.path
                    .as_deref()
                    .is_some_and(|path| !self.config.is_excluded_group(path))
            })
            .map(|node| node.id)
            .collect();
        tracing::debug!("Source groups: {:?}", source_groups);

        Ok(source_groups)
    }

    pub fn source_group(&self) -> Result<NodeId> {
        self.source_groups()?
            .into_iter()
            .next()
            .ok_or_else(|| CandyError::not_found("sourceGroups"))
    }

    pub fn source_path(&self) -> Result<PathBuf> {
        let source_group = self.source_group()?;
        self.full_path(source_group)
    }

    /// Absolute location of `node` on disk.
    pub fn full_path(&self, node: NodeId) -> Result<PathBuf> {
        self.manifest
            .full_path(node, &self.project_root)
            .ok_or_else(|| {
                let label = self
                    .manifest
                    .node(node)
                    .and_then(|n| n.display_name())
                    .unwrap_or("?");
                CandyError::not_found(format!("fullPath for element: {label} ({node})"))
            })
    }

    /// The group at a `/`-separated path below the source group. An empty
    /// path is the source group itself.
    pub fn group_at(&self, group_path: &str) -> Result<NodeId> {
        let source_group = self.source_group()?;
        self.manifest
            .find_group(source_group, group_path)
            .ok_or_else(|| CandyError::not_found(format!("group {group_path}")))
    }

    /// ASCII rendering of the main group's tree.
    pub fn render_tree(&self) -> Result<String> {
        let main_group = self
            .manifest
            .main_group()
            .ok_or_else(|| CandyError::not_found("mainGroup"))?;
        let title = self
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(render::render_tree(&self.manifest, main_group, &title))
    }

    // ============================================================
    // Persistence
    // ============================================================

    /// Serialize the manifest, including every mutation made so far, back to
    /// the location it was opened from.
    pub fn write(&self, overwrite: bool) -> Result<()> {
        self.store.save(&self.manifest, &self.path, overwrite)
    }
}

/// Project root for a manifest location: the parent of a container
/// (`Demo.xcodeproj`), otherwise the location itself.
fn project_root_for(path: &Path, container_marker: &str) -> PathBuf {
    let is_container = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().contains(container_marker));

    match path.parent() {
        Some(parent) if is_container => parent.to_path_buf(),
        _ => path.to_path_buf(),
    }
}
