use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::node::NodeId;

/// A buildable product and the phases that produce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: Uuid,
    pub name: String,
    pub product_type: ProductType,
    #[serde(default)]
    pub build_phases: Vec<BuildPhase>,
}

/// Product classification of a target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProductType {
    #[serde(rename = "com.apple.product-type.application")]
    Application,
    #[serde(rename = "com.apple.product-type.framework")]
    Framework,
    #[serde(rename = "com.apple.product-type.library.static")]
    StaticLibrary,
    #[serde(rename = "com.apple.product-type.library.dynamic")]
    DynamicLibrary,
    #[serde(rename = "com.apple.product-type.bundle")]
    Bundle,
    #[serde(rename = "com.apple.product-type.bundle.unit-test")]
    UnitTestBundle,
    #[serde(rename = "com.apple.product-type.bundle.ui-testing")]
    UiTestBundle,
    #[serde(rename = "com.apple.product-type.app-extension")]
    AppExtension,
    #[serde(rename = "com.apple.product-type.tool")]
    CommandLineTool,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "com.apple.product-type.application",
            Self::Framework => "com.apple.product-type.framework",
            Self::StaticLibrary => "com.apple.product-type.library.static",
            Self::DynamicLibrary => "com.apple.product-type.library.dynamic",
            Self::Bundle => "com.apple.product-type.bundle",
            Self::UnitTestBundle => "com.apple.product-type.bundle.unit-test",
            Self::UiTestBundle => "com.apple.product-type.bundle.ui-testing",
            Self::AppExtension => "com.apple.product-type.app-extension",
            Self::CommandLineTool => "com.apple.product-type.tool",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "com.apple.product-type.application" => Some(Self::Application),
            "com.apple.product-type.framework" => Some(Self::Framework),
            "com.apple.product-type.library.static" => Some(Self::StaticLibrary),
            "com.apple.product-type.library.dynamic" => Some(Self::DynamicLibrary),
            "com.apple.product-type.bundle" => Some(Self::Bundle),
            "com.apple.product-type.bundle.unit-test" => Some(Self::UnitTestBundle),
            "com.apple.product-type.bundle.ui-testing" => Some(Self::UiTestBundle),
            "com.apple.product-type.app-extension" => Some(Self::AppExtension),
            "com.apple.product-type.tool" => Some(Self::CommandLineTool),
            _ => None,
        }
    }
}

/// An ordered list of file memberships applied during one build step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildPhase {
    pub id: Uuid,
    pub kind: BuildPhaseKind,
    #[serde(default)]
    pub files: Vec<BuildFile>,
}

/// The build step a phase belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BuildPhaseKind {
    #[serde(rename = "PBXSourcesBuildPhase")]
    Sources,
    #[serde(rename = "PBXFrameworksBuildPhase")]
    Frameworks,
    #[serde(rename = "PBXResourcesBuildPhase")]
    Resources,
    #[serde(rename = "PBXHeadersBuildPhase")]
    Headers,
    #[serde(rename = "PBXCopyFilesBuildPhase")]
    CopyFiles,
    #[serde(rename = "PBXShellScriptBuildPhase")]
    ShellScript,
}

/// Membership of one file reference in a build phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildFile {
    pub id: Uuid,
    pub file_ref: NodeId,
}

impl Target {
    pub fn new(name: impl Into<String>, product_type: ProductType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            product_type,
            build_phases: Vec::new(),
        }
    }

    /// The first phase of the given kind.
    pub fn build_phase(&self, kind: BuildPhaseKind) -> Option<&BuildPhase> {
        self.build_phases.iter().find(|phase| phase.kind == kind)
    }

    pub fn build_phase_mut(&mut self, kind: BuildPhaseKind) -> Option<&mut BuildPhase> {
        self.build_phases.iter_mut().find(|phase| phase.kind == kind)
    }

    /// The "compile sources" phase, if the target has one.
    pub fn sources_build_phase_mut(&mut self) -> Option<&mut BuildPhase> {
        self.build_phase_mut(BuildPhaseKind::Sources)
    }
}

impl BuildPhase {
    pub fn new(kind: BuildPhaseKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            files: Vec::new(),
        }
    }

    pub fn contains(&self, file_ref: NodeId) -> bool {
        self.files.iter().any(|build_file| build_file.file_ref == file_ref)
    }

    /// Append a membership for `file_ref`, or return the one already present.
    pub fn add_file(&mut self, file_ref: NodeId) -> BuildFile {
        if let Some(existing) = self.files.iter().find(|f| f.file_ref == file_ref) {
            return existing.clone();
        }

        let build_file = BuildFile {
            id: Uuid::new_v4(),
            file_ref,
        };
        self.files.push(build_file.clone());
        build_file
    }
}
