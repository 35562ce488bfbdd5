//! Component model.
//!
//! A [`Component`] is a unit of source code: an id, an ordered set of source
//! files, the last computed build output, and an optional isolation marker
//! recording that the component currently lives inside a provisioned
//! environment. The build core only reads `files` and replaces `dists`;
//! everything else is owned by the calling subsystem.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dist::Dists;
use crate::ids::ComponentId;

/// One source file of a component.
///
/// `path` is relative to `base`; `contents` are raw bytes so binary sources
/// survive an identity build untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    /// Path relative to the component's base directory.
    pub path: PathBuf,
    /// Base directory the path is resolved against.
    #[serde(default)]
    pub base: PathBuf,
    /// Raw file contents.
    pub contents: Vec<u8>,
}

impl SourceFile {
    /// Create a source file from a relative path and contents.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            base: PathBuf::new(),
            contents: contents.into(),
        }
    }

    /// Set the base directory.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = base.into();
        self
    }
}

/// Marker recording that a component lives inside an isolated environment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsolationMarker {
    /// On-disk root of the environment the component was written to.
    pub root: PathBuf,
}

/// Modification state of a component as reported by a workspace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStatus {
    /// Whether the component changed since the last recorded build.
    pub modified: bool,
}

/// A versioned unit of source code with its build output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Stable identity.
    pub id: ComponentId,
    /// Ordered source files.
    pub files: Vec<SourceFile>,
    /// Last computed build output. Replaced wholesale on every successful
    /// build, never partially mutated.
    #[serde(default)]
    pub dists: Dists,
    /// Set when the component currently lives inside a provisioned
    /// isolated environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isolation: Option<IsolationMarker>,
}

impl Component {
    /// Create a component from an id and its source files.
    #[must_use]
    pub fn new(id: impl Into<ComponentId>, files: Vec<SourceFile>) -> Self {
        Self {
            id: id.into(),
            files,
            dists: Dists::default(),
            isolation: None,
        }
    }

    /// Whether the component currently lives inside an isolated environment.
    #[must_use]
    pub fn is_isolated(&self) -> bool {
        self.isolation.is_some()
    }

    /// Root path of the isolated environment, when isolated.
    #[must_use]
    pub fn isolated_root(&self) -> Option<&Path> {
        self.isolation.as_ref().map(|marker| marker.root.as_path())
    }

    /// Mark the component as living inside an isolated environment.
    pub fn set_isolation(&mut self, root: impl Into<PathBuf>) {
        self.isolation = Some(IsolationMarker { root: root.into() });
    }

    /// Replace the component's build output.
    pub fn set_dists(&mut self, dists: Dists) {
        self.dists = dists;
    }

    /// Serialized form of the component, as handed to compilers.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
