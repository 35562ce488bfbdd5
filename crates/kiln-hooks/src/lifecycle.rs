//! Version-pipeline lifecycle adapter.
//!
//! Folds compile results into version persistence. `pre_tag` runs the
//! pre → compile → post sequence for a component and caches the computed
//! dists; `pre_save_version` reads that cache while the version record is
//! being constructed. The cache belongs to the adapter instance — callers
//! must not assume it survives the enclosing build/tag session.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use kiln_core::component::Component;
use kiln_core::dist::Dists;
use kiln_core::ids::ComponentId;

use crate::dispatcher::HookDispatcher;
use crate::errors::HookError;
use crate::types::HookContext;

/// The compile capability the adapter drives between its notifications.
///
/// Implemented over the compiler orchestrator by the wiring layer; the
/// returned dists become the component's build output.
#[async_trait]
pub trait CompileDelegate: Send + Sync {
    /// Compile the component and return its dists.
    async fn compile(&self, component: &mut Component) -> Result<Dists, HookError>;
}

/// A version record under construction by the versioning pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    /// Component the version belongs to.
    pub component_id: ComponentId,
    /// Version name being recorded.
    pub version: String,
    /// Build output attached while saving, when one was compiled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dists: Option<Dists>,
}

impl VersionRecord {
    /// Create a record with no dists attached yet.
    #[must_use]
    pub fn new(component_id: impl Into<ComponentId>, version: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
            version: version.into(),
            dists: None,
        }
    }
}

/// Adapter between the hook system and the versioning pipeline.
pub struct LifecycleAdapter {
    dispatcher: HookDispatcher,
    delegate: Arc<dyn CompileDelegate>,
    dists: Mutex<HashMap<ComponentId, Dists>>,
}

impl LifecycleAdapter {
    /// Create an adapter dispatching through `dispatcher` and compiling
    /// through `delegate`.
    #[must_use]
    pub fn new(dispatcher: HookDispatcher, delegate: Arc<dyn CompileDelegate>) -> Self {
        Self {
            dispatcher,
            delegate,
            dists: Mutex::new(HashMap::new()),
        }
    }

    /// Run the full pre → compile → post sequence for a component.
    ///
    /// The computed dists are cached under the component id for a later
    /// `pre_save_version` and also returned to the caller.
    pub async fn compile_component(
        &self,
        component: &mut Component,
    ) -> Result<Dists, HookError> {
        self.dispatcher
            .dispatch(&HookContext::PreCompile {
                component_id: component.id.clone(),
                component: component.to_json(),
            })
            .await;

        let dists = self.delegate.compile(component).await?;

        self.dispatcher
            .dispatch(&HookContext::PostCompile {
                component_id: component.id.clone(),
                component: component.to_json(),
                dists: dists.clone(),
            })
            .await;

        debug!(component_id = %component.id, dists = dists.len(), "caching compile result");
        let _ = self
            .dists
            .lock()
            .insert(component.id.clone(), dists.clone());
        Ok(dists)
    }

    /// Hook invoked before a new version is recorded for `component`.
    pub async fn pre_tag(&self, component: &mut Component) -> Result<Dists, HookError> {
        self.compile_component(component).await
    }

    /// Hook invoked while a version record is being persisted.
    ///
    /// Attaches the dists cached by an earlier `pre_tag` for the record's
    /// component, or leaves the record untouched when that component was
    /// never compiled by this adapter.
    pub fn pre_save_version(&self, version: &mut VersionRecord) {
        version.dists = self.dists.lock().get(&version.component_id).cloned();
    }

    /// Dists cached for a component, if any.
    #[must_use]
    pub fn cached_dists(&self, id: &ComponentId) -> Option<Dists> {
        self.dists.lock().get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use kiln_core::component::SourceFile;
    use kiln_core::dist::Dist;

    use crate::registry::HookRegistry;

    use super::*;

    struct StubDelegate {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompileDelegate for StubDelegate {
        async fn compile(&self, component: &mut Component) -> Result<Dists, HookError> {
            let _ = self.calls.fetch_add(1, Ordering::SeqCst);
            let dists: Dists = component.files.iter().map(Dist::from_source).collect();
            component.set_dists(dists.clone());
            Ok(dists)
        }
    }

    fn adapter() -> LifecycleAdapter {
        LifecycleAdapter::new(
            HookDispatcher::new(HookRegistry::new()),
            Arc::new(StubDelegate {
                calls: AtomicUsize::new(0),
            }),
        )
    }

    fn component() -> Component {
        Component::new(
            "pkg/a",
            vec![SourceFile::new("index.ts", b"export {};".to_vec())],
        )
    }

    #[tokio::test]
    async fn pre_tag_caches_dists_for_pre_save_version() {
        let adapter = adapter();
        let mut component = component();
        let dists = adapter.pre_tag(&mut component).await.unwrap();

        let mut version = VersionRecord::new("pkg/a", "0.0.2");
        adapter.pre_save_version(&mut version);
        assert_eq!(version.dists, Some(dists));
    }

    #[tokio::test]
    async fn pre_save_version_for_untagged_component_attaches_nothing() {
        let adapter = adapter();
        let mut version = VersionRecord::new("pkg/never-tagged", "0.0.1");
        adapter.pre_save_version(&mut version);
        assert!(version.dists.is_none());
    }

    #[tokio::test]
    async fn compile_component_returns_what_it_caches() {
        let adapter = adapter();
        let mut component = component();
        let dists = adapter.compile_component(&mut component).await.unwrap();
        assert_eq!(adapter.cached_dists(&component.id), Some(dists));
    }
}
