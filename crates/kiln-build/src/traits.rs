//! Compiler capability and collaborator ports.
//!
//! Defines [`Compiler`] — the trait every compiler plugin implements — plus
//! the ports the build core uses to talk to its collaborators: the
//! [`Workspace`] (modification state, layout, dist configuration) and the
//! [`Store`] (artifact persistence). The core never constructs compilers
//! and never looks behind these ports.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use kiln_core::component::{Component, ComponentStatus, SourceFile};
use kiln_core::dist::CompileResponse;
use kiln_core::errors::{CompilerError, StoreError};
use kiln_core::ids::ComponentId;

use crate::context::BuildContext;
use crate::errors::WorkspaceError;

// ─────────────────────────────────────────────────────────────────────────────
// Compiler capability
// ─────────────────────────────────────────────────────────────────────────────

/// Everything a compiler receives for one invocation.
#[derive(Clone, Debug)]
pub struct CompileRequest {
    /// Cloned source files of the component.
    pub files: Vec<SourceFile>,
    /// The compiler's raw configuration blob.
    pub raw_config: Value,
    /// The compiler's dynamic (computed) configuration blob.
    pub dynamic_config: Value,
    /// Configuration files the compiler declared, materialized on disk when
    /// the compiler requires detached configuration.
    pub config_files: Vec<SourceFile>,
    /// Directory the config files were materialized into, for compilers
    /// with detached configuration.
    pub config_dir: Option<std::path::PathBuf>,
    /// Per-invocation context (serialized component, dist dir, build root).
    pub context: BuildContext,
    /// Cooperative cancellation for the invocation.
    pub cancel: CancellationToken,
}

/// The capability every compiler plugin implements.
///
/// `compile` is the single required capability. Detached configuration is
/// an optional capability: a compiler that returns `true` from
/// [`writes_config_files`](Compiler::writes_config_files) gets its declared
/// [`config_files`](Compiler::config_files) materialized into a scratch
/// directory before invocation, and that directory is removed afterwards on
/// every exit path.
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Plugin name, used in logs and error messages.
    fn name(&self) -> &str;

    /// Whether this compiler requires its configuration on disk.
    fn writes_config_files(&self) -> bool {
        false
    }

    /// Configuration files to materialize for detached configuration.
    fn config_files(&self) -> Vec<SourceFile> {
        Vec::new()
    }

    /// Raw configuration blob handed through to `compile`.
    fn raw_config(&self) -> Value {
        Value::Null
    }

    /// Dynamic configuration blob handed through to `compile`.
    fn dynamic_config(&self) -> Value {
        Value::Null
    }

    /// Compile the request's files into output files.
    async fn compile(&self, request: CompileRequest) -> Result<CompileResponse, CompilerError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Workspace port
// ─────────────────────────────────────────────────────────────────────────────

/// Workspace-level distribution configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DistConfig {
    /// Entry point override for distributables.
    pub entry: Option<String>,
    /// Target directory for distributables, relative to the workspace root.
    pub target: Option<String>,
}

impl DistConfig {
    /// Whether distributables live inside the component's own source tree.
    ///
    /// True when neither an entry nor a target override is configured.
    #[must_use]
    pub fn dists_inside_component(&self) -> bool {
        self.entry.is_none() && self.target.is_none()
    }
}

/// A component's placement inside a workspace, from the workspace's map.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentMap {
    /// Root directory declared for the component, relative to the
    /// workspace root.
    pub root_dir: Option<PathBuf>,
    /// The component's own directory, relative to the workspace root.
    pub component_dir: Option<PathBuf>,
}

/// Port to the persistent on-disk project root.
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Absolute path of the workspace root.
    fn root(&self) -> &Path;

    /// Distribution configuration of the workspace.
    fn dist_config(&self) -> DistConfig;

    /// The component's placement, when the workspace tracks it.
    fn component_map(&self, id: &ComponentId) -> Option<ComponentMap>;

    /// Modification state of the component since its last recorded build.
    async fn component_status(
        &self,
        id: &ComponentId,
    ) -> Result<ComponentStatus, WorkspaceError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Store port
// ─────────────────────────────────────────────────────────────────────────────

/// Port to long-term persistence.
#[async_trait]
pub trait Store: Send + Sync {
    /// Persist the component's current dists.
    async fn update_dist(&self, component: &Component) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dist_config_without_overrides_is_inside_component() {
        assert!(DistConfig::default().dists_inside_component());
    }

    #[test]
    fn dist_config_with_target_is_outside_component() {
        let config = DistConfig {
            target: Some("dist".into()),
            ..DistConfig::default()
        };
        assert!(!config.dists_inside_component());
    }

    #[test]
    fn dist_config_with_entry_is_outside_component() {
        let config = DistConfig {
            entry: Some("index.js".into()),
            ..DistConfig::default()
        };
        assert!(!config.dists_inside_component());
    }
}
