use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an object in the manifest's object graph.
pub type NodeId = Uuid;

/// An element of the project navigator tree.
///
/// Groups and file references share the `name`/`path` pair. `name` is the
/// display label; `path` is the segment that contributes to the element's
/// location on disk. Either may be absent. Parent links are not stored here:
/// the owning [`Manifest`](super::Manifest) keeps a parent index next to the
/// object arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub source_tree: SourceTree,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Variant-specific data. Only groups own children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "isa")]
pub enum NodeKind {
    #[serde(rename = "PBXGroup")]
    Group {
        #[serde(default)]
        children: Vec<NodeId>,
    },
    #[serde(rename = "PBXFileReference")]
    FileReference {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explicit_file_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        last_known_file_type: Option<String>,
    },
}

/// What a node's `path` is relative to.
///
/// - `Group`: the enclosing group's resolved location
/// - `SourceRoot`: the project root
/// - `Absolute`: nothing; `path` is already absolute
/// - `BuildProductsDir`, `SdkRoot`, `DeveloperDir`: build-time locations that
///   cannot be resolved against the project
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceTree {
    #[default]
    #[serde(rename = "<group>")]
    Group,
    #[serde(rename = "SOURCE_ROOT")]
    SourceRoot,
    #[serde(rename = "<absolute>")]
    Absolute,
    #[serde(rename = "BUILT_PRODUCTS_DIR")]
    BuildProductsDir,
    #[serde(rename = "SDKROOT")]
    SdkRoot,
    #[serde(rename = "DEVELOPER_DIR")]
    DeveloperDir,
}

impl SourceTree {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "<group>",
            Self::SourceRoot => "SOURCE_ROOT",
            Self::Absolute => "<absolute>",
            Self::BuildProductsDir => "BUILT_PRODUCTS_DIR",
            Self::SdkRoot => "SDKROOT",
            Self::DeveloperDir => "DEVELOPER_DIR",
        }
    }
}

impl Node {
    /// A group with the given label and folder segment.
    pub fn group(name: Option<String>, path: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            path,
            source_tree: SourceTree::Group,
            kind: NodeKind::Group {
                children: Vec::new(),
            },
        }
    }

    /// A file reference whose file types are inferred from the path's extension.
    pub fn file_reference(name: Option<String>, path: String, source_tree: SourceTree) -> Self {
        let file_type = file_type_for_path(&path).map(str::to_string);
        Self {
            id: Uuid::new_v4(),
            name,
            path: Some(path),
            source_tree,
            kind: NodeKind::FileReference {
                explicit_file_type: file_type.clone(),
                last_known_file_type: file_type,
            },
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group { .. })
    }

    pub fn is_file_reference(&self) -> bool {
        matches!(self.kind, NodeKind::FileReference { .. })
    }

    /// Children of a group; empty for file references.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Group { children } => children,
            NodeKind::FileReference { .. } => &[],
        }
    }

    pub fn explicit_file_type(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::FileReference {
                explicit_file_type, ..
            } => explicit_file_type.as_deref(),
            NodeKind::Group { .. } => None,
        }
    }

    pub fn last_known_file_type(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::FileReference {
                last_known_file_type,
                ..
            } => last_known_file_type.as_deref(),
            NodeKind::Group { .. } => None,
        }
    }

    /// Label shown in the navigator: the name if set, otherwise the path.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.path.as_deref())
    }

    /// Whether this node maps `segment` on disk.
    pub fn is_folder_for(&self, segment: &str) -> bool {
        self.path.as_deref() == Some(segment)
    }

    /// Whether this node is a pathless label named `segment`.
    pub fn is_label_for(&self, segment: &str) -> bool {
        self.path.is_none() && self.name.as_deref() == Some(segment)
    }
}

/// Toolchain file type for a file name, keyed by extension.
pub fn file_type_for_path(path: &str) -> Option<&'static str> {
    let extension = std::path::Path::new(path).extension()?.to_str()?;
    let file_type = match extension {
        "swift" => "sourcecode.swift",
        "m" => "sourcecode.c.objc",
        "mm" => "sourcecode.cpp.objcpp",
        "h" => "sourcecode.c.h",
        "c" => "sourcecode.c.c",
        "cpp" | "cc" | "cxx" => "sourcecode.cpp.cpp",
        "hpp" => "sourcecode.cpp.h",
        "metal" => "sourcecode.metal",
        "storyboard" => "file.storyboard",
        "xib" => "file.xib",
        "plist" => "text.plist.xml",
        "strings" => "text.plist.strings",
        "json" => "text.json",
        "md" => "net.daringfireball.markdown",
        "txt" => "text",
        "png" => "image.png",
        "jpg" | "jpeg" => "image.jpeg",
        "xcassets" => "folder.assetcatalog",
        "framework" => "wrapper.framework",
        "app" => "wrapper.application",
        "xctest" => "wrapper.cfbundle",
        "entitlements" => "text.plist.entitlements",
        _ => return None,
    };
    Some(file_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_reference_infers_type() {
        let node = Node::file_reference(None, "Sources/App.swift".into(), SourceTree::Group);
        assert_eq!(node.explicit_file_type(), Some("sourcecode.swift"));
        assert_eq!(node.last_known_file_type(), Some("sourcecode.swift"));
    }

    #[test]
    fn test_unknown_extension_has_no_type() {
        let node = Node::file_reference(None, "README".into(), SourceTree::Group);
        assert_eq!(node.explicit_file_type(), None);
    }

    #[test]
    fn test_folder_and_label_segments() {
        let folder = Node::group(None, Some("Views".into()));
        let label = Node::group(Some("Models".into()), None);
        let renamed = Node::group(Some("Foo".into()), Some("Bar".into()));

        assert!(folder.is_folder_for("Views"));
        assert!(!folder.is_label_for("Views"));
        assert!(label.is_label_for("Models"));
        assert!(!label.is_folder_for("Models"));
        assert!(renamed.is_folder_for("Bar"));
        assert!(!renamed.is_folder_for("Foo"));
        assert!(!renamed.is_label_for("Foo"));
    }

    #[test]
    fn test_serializes_with_isa_tag() {
        let node = Node::group(None, Some("App".into()));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["isa"], "PBXGroup");
        assert_eq!(json["source_tree"], "<group>");
        assert!(json.get("name").is_none());

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }
}
