//! Build executor — one compiler invocation against one build root.
//!
//! Pipeline: resolve dist dir → materialize detached config → invoke the
//! compiler → collect output. The scratch directory holding detached
//! configuration is removed on every exit path; compiler failures are
//! aggregated and tagged with the component id.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use kiln_core::component::Component;
use kiln_core::constants::DEFAULT_DIST_DIRNAME;
use kiln_core::dist::OutputFile;
use kiln_core::errors::CompilerError;

use crate::config::ConfigScratch;
use crate::context::BuildContext;
use crate::errors::BuildError;
use crate::options::BuildOptions;
use crate::traits::{CompileRequest, Compiler, ComponentMap, Workspace};

/// Resolve the output directory for a build root.
///
/// A workspace that tracks the component wins: its configured dist target
/// (default [`DEFAULT_DIST_DIRNAME`]) under the workspace root, extended by
/// the component-map-declared root directory. Otherwise the default dist
/// directory under the build root.
fn resolve_dist_dir(
    build_root: &Path,
    workspace: Option<&dyn Workspace>,
    component_map: Option<&ComponentMap>,
) -> PathBuf {
    if let (Some(workspace), Some(map)) = (workspace, component_map) {
        let config = workspace.dist_config();
        let target = config.target.as_deref().unwrap_or(DEFAULT_DIST_DIRNAME);
        let mut dir = workspace.root().join(target);
        if let Some(root_dir) = &map.root_dir {
            dir = dir.join(root_dir);
        }
        return dir;
    }
    build_root.join(DEFAULT_DIST_DIRNAME)
}

/// Run one compiler against a resolved build root.
///
/// Returns the compiler's output files. On failure the config
/// scratch directory (when one was materialized) is removed before the
/// error propagates, and compiler failures are flattened into an
/// aggregated error tagged with the component id.
#[instrument(skip_all, fields(component_id = %component.id, compiler = compiler.name()))]
pub async fn run_build(
    component: &Component,
    compiler: &dyn Compiler,
    build_root: &Path,
    workspace: Option<&dyn Workspace>,
    options: &BuildOptions,
) -> Result<Vec<OutputFile>, BuildError> {
    if options.cancel.is_cancelled() {
        return Err(BuildError::Cancelled);
    }

    let component_map = workspace.and_then(|ws| ws.component_map(&component.id));
    let root_dist_dir = resolve_dist_dir(build_root, workspace, component_map.as_ref());
    let component_dir = component_map
        .as_ref()
        .and_then(|map| map.component_dir.clone())
        .unwrap_or_default();

    let scratch = if compiler.writes_config_files() {
        let parent = workspace.map(|ws| ws.root());
        Some(ConfigScratch::materialize(&component.id, compiler, parent, options.verbose).await?)
    } else {
        None
    };

    let context = BuildContext {
        component: component.to_json(),
        root_dist_dir,
        component_dir,
        build_root: build_root.to_path_buf(),
    };
    let request = CompileRequest {
        files: component.files.clone(),
        raw_config: compiler.raw_config(),
        dynamic_config: compiler.dynamic_config(),
        config_files: compiler.config_files(),
        config_dir: scratch.as_ref().map(|scratch| scratch.path().to_path_buf()),
        context,
        cancel: options.cancel.clone(),
    };

    debug!(build_root = %build_root.display(), "invoking compiler");
    let result = tokio::select! {
        () = options.cancel.cancelled() => Err(CompilerError::failed("cancelled")),
        result = compiler.compile(request) => result,
    };

    match result {
        Ok(response) => {
            if let Some(scratch) = scratch {
                scratch.remove();
            }
            debug!(files = response.files.len(), "compiler finished");
            Ok(response.files)
        }
        Err(err) => {
            if let Some(scratch) = scratch {
                scratch.remove();
            }
            if options.cancel.is_cancelled() {
                return Err(BuildError::Cancelled);
            }
            Err(BuildError::aggregated(component.id.as_str(), err))
        }
    }
}
