//! Compiler orchestrator — the concurrent multi-compiler build.
//!
//! Resolves a build root per compiler (workspace root, the component's
//! existing isolated environment, or a freshly provisioned one), runs the
//! executor for every compiler concurrently, and assembles the outputs into
//! the component's dists in compiler declaration order — regardless of
//! completion order. Either the full set of compiler outputs is reflected,
//! or an error is raised and the previously stored dists remain untouched.

use std::sync::Arc;

use futures::future::join_all;
use tracing::debug;

use kiln_core::component::Component;
use kiln_core::dist::{Dist, Dists, OutputFile};
use kiln_core::ids::ComponentId;
use kiln_isolation::environment::{EnvironmentFactory, IsolateOptions};
use kiln_isolation::provision::with_isolated_environment;

use crate::errors::BuildError;
use crate::executor;
use crate::options::BuildOptions;
use crate::policy;
use crate::traits::{Compiler, Store, Workspace};

/// Orchestrates component builds across pluggable compilers.
pub struct Orchestrator {
    store: Arc<dyn Store>,
    workspace: Option<Arc<dyn Workspace>>,
    environments: Arc<dyn EnvironmentFactory>,
}

impl Orchestrator {
    /// Create an orchestrator without a workspace (scope / isolated
    /// contexts).
    #[must_use]
    pub fn new(store: Arc<dyn Store>, environments: Arc<dyn EnvironmentFactory>) -> Self {
        Self {
            store,
            workspace: None,
            environments,
        }
    }

    /// Attach the workspace this orchestrator builds inside.
    #[must_use]
    pub fn with_workspace(mut self, workspace: Arc<dyn Workspace>) -> Self {
        self.workspace = Some(workspace);
        self
    }

    fn workspace_ref(&self) -> Option<&dyn Workspace> {
        self.workspace.as_deref()
    }

    /// Build one component with the given compilers.
    ///
    /// With no compilers the rebuild policy's no-compiler branch applies.
    /// Otherwise, unless the policy demands a rebuild, non-empty stored
    /// dists are returned unchanged. A successful build replaces the
    /// component's dists wholesale and optionally persists them through the
    /// store.
    pub async fn build(
        &self,
        component: &mut Component,
        compilers: &[Arc<dyn Compiler>],
        options: &BuildOptions,
    ) -> Result<Dists, BuildError> {
        debug!(component_id = %component.id, compilers = compilers.len(), "build requested");

        if compilers.is_empty() {
            return Ok(policy::build_without_compilers(
                component,
                self.workspace_ref(),
            ));
        }

        let rebuild =
            policy::should_rebuild(self.workspace_ref(), options.no_cache, component).await?;
        if !rebuild && !component.dists.is_empty() {
            debug!(
                component_id = %component.id,
                "component not modified, using the stored dists"
            );
            return Ok(component.dists.clone());
        }

        let outputs = self.run_compilers(component, compilers, options).await?;

        let mut collected: Vec<Dist> = Vec::new();
        for (compiler, files) in compilers.iter().zip(outputs) {
            debug!(
                compiler = compiler.name(),
                files = files.len(),
                "collecting compiler output"
            );
            for file in files {
                collected.push(Dist::from_output(file, compiler.name())?);
            }
        }

        let dists = Dists::new(collected);
        component.set_dists(dists.clone());
        if options.save {
            self.store.update_dist(component).await?;
        }
        Ok(dists)
    }

    /// Build several independent components concurrently.
    ///
    /// Per-component failures are captured independently; one component's
    /// failure never affects another's result. No cross-component ordering
    /// is guaranteed beyond the returned pairing.
    pub async fn build_many(
        &self,
        components: &mut [Component],
        compilers: &[Arc<dyn Compiler>],
        options: &BuildOptions,
    ) -> Vec<(ComponentId, Result<Dists, BuildError>)> {
        let builds = components.iter_mut().map(|component| async move {
            let id = component.id.clone();
            let result = self.build(component, compilers, options).await;
            (id, result)
        });
        join_all(builds).await
    }

    /// Run every compiler concurrently and return their outputs in
    /// declaration order.
    ///
    /// All invocations run to completion (each owns its cleanup) before the
    /// first captured failure propagates.
    async fn run_compilers(
        &self,
        component: &Component,
        compilers: &[Arc<dyn Compiler>],
        options: &BuildOptions,
    ) -> Result<Vec<Vec<OutputFile>>, BuildError> {
        if compilers.is_empty() {
            return Err(BuildError::Configuration {
                component_id: component.id.to_string(),
            });
        }
        let invocations = compilers
            .iter()
            .map(|compiler| self.run_one(component, Arc::clone(compiler), options));
        join_all(invocations).await.into_iter().collect()
    }

    /// Resolve a build root for one compiler and run the executor against
    /// it.
    async fn run_one(
        &self,
        component: &Component,
        compiler: Arc<dyn Compiler>,
        options: &BuildOptions,
    ) -> Result<Vec<OutputFile>, BuildError> {
        if let Some(workspace) = &self.workspace {
            let root = workspace.root().to_path_buf();
            return executor::run_build(
                component,
                compiler.as_ref(),
                &root,
                Some(workspace.as_ref()),
                options,
            )
            .await;
        }

        if let Some(root) = component.isolated_root() {
            let root = root.to_path_buf();
            return executor::run_build(component, compiler.as_ref(), &root, None, options).await;
        }

        let provider = self.environments.create_environment(None)?;
        let isolate_options = IsolateOptions {
            verbose: options.verbose,
            ..IsolateOptions::default()
        };
        with_isolated_environment(
            provider.as_ref(),
            &component.id,
            &isolate_options,
            options.keep,
            &options.cancel,
            |isolated| async move {
                executor::run_build(component, compiler.as_ref(), &isolated.root, None, options)
                    .await
            },
        )
        .await
    }
}
