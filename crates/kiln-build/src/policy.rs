//! Rebuild-decision policy.
//!
//! Decides whether compilation must run at all, and what to do when no
//! compiler is registered for a component. The only cache-invalidation
//! signals are the explicit `no_cache` flag and the workspace-reported
//! modification state.

use tracing::debug;

use kiln_core::component::Component;
use kiln_core::dist::{Dist, Dists};

use crate::errors::BuildError;
use crate::traits::Workspace;

/// Whether a component must be rebuilt.
///
/// `no_cache` always forces a rebuild. Without a workspace there is no
/// modification evidence, so the policy reports `false` and stored dists
/// win — the caller still rebuilds when it has none. With a workspace,
/// rebuild iff the workspace reports the component modified.
pub async fn should_rebuild(
    workspace: Option<&dyn Workspace>,
    no_cache: bool,
    component: &Component,
) -> Result<bool, BuildError> {
    if no_cache {
        return Ok(true);
    }
    let Some(workspace) = workspace else {
        return Ok(false);
    };
    let status = workspace.component_status(&component.id).await?;
    Ok(status.modified)
}

/// Handle a build request for a component with no registered compilers.
///
/// When the workspace keeps distributables inside the component's own
/// source tree (or there is no workspace at all), there is nothing to
/// produce and the component is left untouched. When distributables are
/// configured to live outside the component tree, the source files are
/// copied verbatim as the build output (an identity build).
pub fn build_without_compilers(
    component: &mut Component,
    workspace: Option<&dyn Workspace>,
) -> Dists {
    let inside = workspace.is_none_or(|ws| ws.dist_config().dists_inside_component());
    if inside {
        debug!(component_id = %component.id, "no compiler found, nothing to build");
        return Dists::default();
    }

    debug!(
        component_id = %component.id,
        "no compiler found, dists live outside the component tree; saving sources as dists"
    );
    let dists: Dists = component.files.iter().map(Dist::from_source).collect();
    component.set_dists(dists.clone());
    dists
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use async_trait::async_trait;

    use kiln_core::component::{ComponentStatus, SourceFile};
    use kiln_core::ids::ComponentId;

    use crate::errors::WorkspaceError;
    use crate::traits::{ComponentMap, DistConfig};

    use super::*;

    struct StubWorkspace {
        root: PathBuf,
        modified: bool,
        dist_config: DistConfig,
    }

    impl StubWorkspace {
        fn new(modified: bool, dist_config: DistConfig) -> Self {
            Self {
                root: PathBuf::from("/ws"),
                modified,
                dist_config,
            }
        }
    }

    #[async_trait]
    impl Workspace for StubWorkspace {
        fn root(&self) -> &Path {
            &self.root
        }

        fn dist_config(&self) -> DistConfig {
            self.dist_config.clone()
        }

        fn component_map(&self, _id: &ComponentId) -> Option<ComponentMap> {
            None
        }

        async fn component_status(
            &self,
            _id: &ComponentId,
        ) -> Result<ComponentStatus, WorkspaceError> {
            Ok(ComponentStatus {
                modified: self.modified,
            })
        }
    }

    fn component() -> Component {
        Component::new(
            "pkg/a",
            vec![SourceFile::new("index.ts", b"export {};".to_vec())],
        )
    }

    #[tokio::test]
    async fn no_cache_always_rebuilds() {
        let workspace = StubWorkspace::new(false, DistConfig::default());
        let rebuild = should_rebuild(Some(&workspace), true, &component())
            .await
            .unwrap();
        assert!(rebuild);
    }

    #[tokio::test]
    async fn unmodified_component_skips_rebuild() {
        let workspace = StubWorkspace::new(false, DistConfig::default());
        let rebuild = should_rebuild(Some(&workspace), false, &component())
            .await
            .unwrap();
        assert!(!rebuild);
    }

    #[tokio::test]
    async fn modified_component_rebuilds() {
        let workspace = StubWorkspace::new(true, DistConfig::default());
        let rebuild = should_rebuild(Some(&workspace), false, &component())
            .await
            .unwrap();
        assert!(rebuild);
    }

    #[tokio::test]
    async fn without_workspace_stored_dists_win() {
        let rebuild = should_rebuild(None, false, &component()).await.unwrap();
        assert!(!rebuild);
    }

    #[test]
    fn no_compilers_inside_tree_is_a_no_op() {
        let workspace = StubWorkspace::new(false, DistConfig::default());
        let mut component = component();
        let dists = build_without_compilers(&mut component, Some(&workspace));
        assert!(dists.is_empty());
        assert!(component.dists.is_empty());
    }

    #[test]
    fn no_compilers_outside_tree_copies_sources_verbatim() {
        let workspace = StubWorkspace::new(
            false,
            DistConfig {
                target: Some("dist".into()),
                ..DistConfig::default()
            },
        );
        let mut component = component();
        let dists = build_without_compilers(&mut component, Some(&workspace));
        assert_eq!(dists.len(), 1);
        let dist = &dists.as_slice()[0];
        assert_eq!(dist.path, PathBuf::from("index.ts"));
        assert_eq!(dist.contents, b"export {};");
        assert_eq!(component.dists, dists);
    }
}
