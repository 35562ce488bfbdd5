//! Per-invocation build context.

use std::path::PathBuf;

use serde::Serialize;

/// Transient record handed to a compiler for one invocation.
///
/// The build root is an explicit field: all relative paths a compiler
/// resolves are resolved against `build_root`, never against ambient
/// process state such as the working directory.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildContext {
    /// Serialized form of the component being compiled.
    pub component: serde_json::Value,
    /// Resolved output directory for this build root.
    pub root_dist_dir: PathBuf,
    /// The component's directory relative to its root, when known.
    pub component_dir: PathBuf,
    /// Root directory the build runs against.
    pub build_root: PathBuf,
}
