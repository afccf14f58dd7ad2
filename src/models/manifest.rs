use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CandyError, Result};

use super::node::{Node, NodeId, NodeKind};
use super::target::{BuildPhase, BuildPhaseKind, ProductType, Target};

const ARCHIVE_VERSION: u32 = 1;
const OBJECT_VERSION: u32 = 50;

/// Entry point of the object graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootObject {
    pub id: Uuid,
    pub main_group: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products_group: Option<NodeId>,
}

/// The whole project description: navigator tree, root object and targets.
///
/// Nodes live in an arena keyed by [`NodeId`]. Groups own their children
/// top-down through id lists; the reverse edge is kept in a parent index that
/// is rebuilt whenever a manifest is deserialized and maintained by every
/// insertion. The index is never persisted. Deserializing fails if the child
/// lists do not form a tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ManifestData", into = "ManifestData")]
pub struct Manifest {
    pub archive_version: u32,
    pub object_version: u32,
    pub(crate) root_object: Option<RootObject>,
    pub(crate) objects: BTreeMap<NodeId, Node>,
    pub(crate) targets: Vec<Target>,
    pub(crate) parents: HashMap<NodeId, NodeId>,
}

/// Persisted shape of a [`Manifest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ManifestData {
    archive_version: u32,
    object_version: u32,
    #[serde(default)]
    root_object: Option<RootObject>,
    #[serde(default)]
    objects: BTreeMap<NodeId, Node>,
    #[serde(default)]
    targets: Vec<Target>,
}

impl TryFrom<ManifestData> for Manifest {
    type Error = CandyError;

    fn try_from(data: ManifestData) -> Result<Self> {
        let mut manifest = Self {
            archive_version: data.archive_version,
            object_version: data.object_version,
            root_object: data.root_object,
            objects: data.objects,
            targets: data.targets,
            parents: HashMap::new(),
        };
        manifest.reindex()?;
        Ok(manifest)
    }
}

impl From<Manifest> for ManifestData {
    fn from(manifest: Manifest) -> Self {
        Self {
            archive_version: manifest.archive_version,
            object_version: manifest.object_version,
            root_object: manifest.root_object,
            objects: manifest.objects,
            targets: manifest.targets,
        }
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            archive_version: ARCHIVE_VERSION,
            object_version: OBJECT_VERSION,
            root_object: None,
            objects: BTreeMap::new(),
            targets: Vec::new(),
            parents: HashMap::new(),
        }
    }
}

impl Manifest {
    /// A manifest containing only an empty main group.
    pub fn new() -> Self {
        Self::with_main_group().0
    }

    fn with_main_group() -> (Self, NodeId) {
        let mut manifest = Self::default();
        let main_group = Node::group(None, None);
        let main_group_id = main_group.id;
        manifest.objects.insert(main_group_id, main_group);
        manifest.root_object = Some(RootObject {
            id: Uuid::new_v4(),
            main_group: Some(main_group_id),
            products_group: None,
        });
        (manifest, main_group_id)
    }

    /// A freshly scaffolded application project named `name`.
    ///
    /// Layout:
    /// ```text
    /// <main group>
    /// ├── name/          (folder)
    /// ├── nameTests/     (folder)
    /// └── Products       (label)
    /// ```
    /// with an application target (sources, frameworks, resources) and a
    /// unit-test target (sources).
    pub fn new_application(name: &str) -> Self {
        let (mut manifest, main_group) = Self::with_main_group();

        manifest.push_child(main_group, Node::group(None, Some(name.to_string())));
        manifest.push_child(main_group, Node::group(None, Some(format!("{name}Tests"))));
        let products = manifest.push_child(main_group, Node::group(Some("Products".into()), None));
        if let Some(root) = manifest.root_object.as_mut() {
            root.products_group = Some(products);
        }

        let mut app = Target::new(name, ProductType::Application);
        app.build_phases.push(BuildPhase::new(BuildPhaseKind::Sources));
        app.build_phases.push(BuildPhase::new(BuildPhaseKind::Frameworks));
        app.build_phases.push(BuildPhase::new(BuildPhaseKind::Resources));
        manifest.targets.push(app);

        let mut tests = Target::new(format!("{name}Tests"), ProductType::UnitTestBundle);
        tests.build_phases.push(BuildPhase::new(BuildPhaseKind::Sources));
        manifest.targets.push(tests);

        manifest
    }

    pub fn root_object(&self) -> Option<&RootObject> {
        self.root_object.as_ref()
    }

    pub fn set_root_object(&mut self, root_object: Option<RootObject>) {
        self.root_object = root_object;
    }

    /// The tree's entry point, if the root object names one.
    pub fn main_group(&self) -> Option<NodeId> {
        self.root_object.as_ref().and_then(|root| root.main_group)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.objects.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.objects.get_mut(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.objects.values()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(&id).copied()
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn targets_mut(&mut self) -> &mut Vec<Target> {
        &mut self.targets
    }

    pub fn target(&self, id: Uuid) -> Option<&Target> {
        self.targets.iter().find(|target| target.id == id)
    }

    pub fn target_mut(&mut self, id: Uuid) -> Option<&mut Target> {
        self.targets.iter_mut().find(|target| target.id == id)
    }

    /// Rebuild the parent index from the groups' child lists.
    ///
    /// Fails with [`CandyError::InvalidTree`] if a node is listed under more
    /// than one group (or twice under the same one), or if following parents
    /// from any node loops.
    pub fn reindex(&mut self) -> Result<()> {
        self.parents.clear();
        for node in self.objects.values() {
            if let NodeKind::Group { children } = &node.kind {
                for child in children {
                    if let Some(previous) = self.parents.insert(*child, node.id) {
                        self.parents.clear();
                        return Err(CandyError::InvalidTree(format!(
                            "{child} is a child of both {previous} and {}",
                            node.id
                        )));
                    }
                }
            }
        }

        let limit = self.parents.len();
        let cyclic = self.parents.keys().copied().find(|start| {
            let mut current = *start;
            for _ in 0..=limit {
                match self.parents.get(&current) {
                    Some(parent) => current = *parent,
                    None => return false,
                }
            }
            true
        });
        if let Some(start) = cyclic {
            self.parents.clear();
            return Err(CandyError::InvalidTree(format!(
                "{start} is its own ancestor"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_application_layout() {
        let manifest = Manifest::new_application("Demo");
        let main_group = manifest.main_group().unwrap();
        let children: Vec<_> = manifest
            .node(main_group)
            .unwrap()
            .children()
            .iter()
            .map(|id| manifest.node(*id).unwrap().display_name().unwrap().to_string())
            .collect();

        assert_eq!(children, vec!["Demo", "DemoTests", "Products"]);
        assert_eq!(manifest.targets().len(), 2);
        assert_eq!(manifest.targets()[0].product_type, ProductType::Application);
    }

    #[test]
    fn test_deserialize_rebuilds_parent_index() {
        let manifest = Manifest::new_application("Demo");
        let json = serde_json::to_string(&manifest).unwrap();
        assert!(!json.contains("parents"));

        let loaded: Manifest = serde_json::from_str(&json).unwrap();
        let main_group = loaded.main_group().unwrap();
        for child in loaded.node(main_group).unwrap().children() {
            assert_eq!(loaded.parent(*child), Some(main_group));
        }
        assert_eq!(loaded, manifest);
    }

    fn group_with_children(children: Vec<NodeId>) -> Node {
        let mut group = Node::group(None, Some("G".into()));
        group.kind = NodeKind::Group { children };
        group
    }

    #[test]
    fn test_reindex_rejects_cycle() {
        let mut manifest = Manifest::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut group_a = group_with_children(vec![b]);
        group_a.id = a;
        let mut group_b = group_with_children(vec![a]);
        group_b.id = b;
        manifest.objects.insert(a, group_a);
        manifest.objects.insert(b, group_b);

        let err = manifest.reindex().unwrap_err();
        assert!(matches!(err, CandyError::InvalidTree(_)));
    }

    #[test]
    fn test_reindex_rejects_self_child() {
        let mut manifest = Manifest::new();
        let a = Uuid::new_v4();
        let mut group = group_with_children(vec![a]);
        group.id = a;
        manifest.objects.insert(a, group);

        assert!(matches!(manifest.reindex(), Err(CandyError::InvalidTree(_))));
    }

    #[test]
    fn test_reindex_rejects_second_parent() {
        let mut manifest = Manifest::new_application("Demo");
        let main_group = manifest.main_group().unwrap();
        let shared = manifest.node(main_group).unwrap().children()[0];
        let mut other = group_with_children(vec![shared]);
        let other_id = other.id;
        other.path = Some("Other".into());
        manifest.push_child(main_group, other);
        assert_eq!(manifest.node(other_id).unwrap().children(), &[shared]);

        let err = manifest.reindex().unwrap_err();
        assert!(err.to_string().contains("is a child of both"));
    }

    #[test]
    fn test_reindex_accepts_tree() {
        let mut manifest = Manifest::new_application("Demo");
        let before = manifest.parents.clone();
        manifest.reindex().unwrap();
        assert_eq!(manifest.parents, before);
    }
}
