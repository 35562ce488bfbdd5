//! Environment lifecycle and the tempdir-backed local provider.
//!
//! [`with_isolated_environment`] wraps one build body in the full
//! create → isolate → body → destroy lifecycle. Teardown rules:
//!
//! - body succeeded, `keep == false` → destroy, propagate destroy failures
//! - body succeeded, `keep == true` → leave the environment for inspection
//! - isolation setup or body failed → destroy unconditionally (`keep` is
//!   ignored), then propagate the original failure
//! - cancellation observed → destroy, surface [`IsolationError::Cancelled`]

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use kiln_core::component::Component;
use kiln_core::constants::{DEPENDENCIES_DIRNAME, MANIFEST_FILENAME};
use kiln_core::ids::ComponentId;

use crate::environment::{
    EnvironmentFactory, EnvironmentProvider, IsolateOptions, IsolatedComponent, TempRoot,
};
use crate::errors::IsolationError;

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle wrapper
// ─────────────────────────────────────────────────────────────────────────────

/// Provision an isolated environment for `id`, run `body` against the
/// isolated component, and tear the environment down.
///
/// `keep` suppresses teardown only when `body` succeeds. Any failure —
/// during creation, isolation, or the body itself — destroys the
/// environment before the error propagates; a teardown failure on that path
/// is logged rather than allowed to mask the original error.
pub async fn with_isolated_environment<T, E, F, Fut>(
    provider: &dyn EnvironmentProvider,
    id: &ComponentId,
    options: &IsolateOptions,
    keep: bool,
    cancel: &CancellationToken,
    body: F,
) -> Result<T, E>
where
    E: From<IsolationError>,
    F: FnOnce(IsolatedComponent) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if cancel.is_cancelled() {
        return Err(IsolationError::Cancelled.into());
    }

    let setup = async {
        provider.create().await?;
        tokio::select! {
            () = cancel.cancelled() => Err(IsolationError::Cancelled),
            isolated = provider.isolate_component(id, options) => isolated,
        }
    }
    .await;

    let isolated = match setup {
        Ok(isolated) => isolated,
        Err(err) => {
            destroy_before_propagating(provider).await;
            return Err(err.into());
        }
    };

    let result = tokio::select! {
        () = cancel.cancelled() => Err(E::from(IsolationError::Cancelled)),
        result = body(isolated) => result,
    };

    match result {
        Ok(value) => {
            if keep {
                debug!(component_id = %id, root = ?provider.root(), "keeping isolated environment");
                provider.retain();
            } else {
                provider.destroy().await?;
            }
            Ok(value)
        }
        Err(err) => {
            destroy_before_propagating(provider).await;
            Err(err)
        }
    }
}

/// Destroy on the failure path. Completes before the original error is
/// re-raised; its own failure must not mask that error, so it is logged.
async fn destroy_before_propagating(provider: &dyn EnvironmentProvider) {
    if let Err(destroy_err) = provider.destroy().await {
        warn!(error = %destroy_err, "failed to destroy isolated environment after error");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Component source / package installer ports
// ─────────────────────────────────────────────────────────────────────────────

/// Port resolving a component and its transitive dependency closure.
#[async_trait]
pub trait ComponentSource: Send + Sync {
    /// Resolve `id` into the component itself and its dependency closure.
    async fn resolve(
        &self,
        id: &ComponentId,
    ) -> Result<(Component, Vec<Component>), IsolationError>;
}

/// Port installing the packages of an isolated component.
#[async_trait]
pub trait PackageInstaller: Send + Sync {
    /// Install packages under `root`.
    async fn install(&self, root: &Path, verbose: bool) -> Result<(), IsolationError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Local provider
// ─────────────────────────────────────────────────────────────────────────────

/// Manifest written into an isolated environment.
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvironmentManifest<'a> {
    id: &'a ComponentId,
    dependencies: Vec<&'a ComponentId>,
}

/// Tempdir-backed [`EnvironmentProvider`].
///
/// Single-use: `create` allocates a fresh temporary root, `destroy` removes
/// it. The component is written under its id, the dependency closure under
/// [`DEPENDENCIES_DIRNAME`].
pub struct LocalEnvironmentProvider {
    source: Arc<dyn ComponentSource>,
    installer: Option<Arc<dyn PackageInstaller>>,
    hint: Option<PathBuf>,
    root: Mutex<Option<TempRoot>>,
}

impl LocalEnvironmentProvider {
    /// Create a provider that resolves components through `source`.
    #[must_use]
    pub fn new(source: Arc<dyn ComponentSource>) -> Self {
        Self {
            source,
            installer: None,
            hint: None,
            root: Mutex::new(None),
        }
    }

    /// Install packages through `installer` when isolation requests it.
    #[must_use]
    pub fn with_installer(mut self, installer: Arc<dyn PackageInstaller>) -> Self {
        self.installer = Some(installer);
        self
    }

    /// Allocate the temporary root under `hint` instead of the system temp
    /// directory.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<PathBuf>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    async fn write_component(
        root: &Path,
        component: &Component,
    ) -> Result<(), IsolationError> {
        for file in &component.files {
            let path = root.join(&file.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&path, &file.contents).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl EnvironmentProvider for LocalEnvironmentProvider {
    async fn create(&self) -> Result<(), IsolationError> {
        let root = TempRoot::allocate(self.hint.as_deref()).map_err(|err| {
            IsolationError::Create {
                message: err.to_string(),
            }
        })?;
        debug!(root = %root.path().display(), "created isolated environment");
        *self.root.lock() = Some(root);
        Ok(())
    }

    async fn isolate_component(
        &self,
        id: &ComponentId,
        options: &IsolateOptions,
    ) -> Result<IsolatedComponent, IsolationError> {
        let root = self
            .root()
            .ok_or_else(|| IsolationError::isolate(id.as_str(), "environment not created"))?;

        let (mut component, dependencies) = self.source.resolve(id).await?;
        let component_root = root.join(id.as_str());

        Self::write_component(&component_root, &component).await?;
        for dependency in &dependencies {
            let dependency_root = root
                .join(DEPENDENCIES_DIRNAME)
                .join(dependency.id.as_str());
            Self::write_component(&dependency_root, dependency).await?;
        }

        if !options.no_manifest {
            let manifest = EnvironmentManifest {
                id: &component.id,
                dependencies: dependencies.iter().map(|dep| &dep.id).collect(),
            };
            let payload = serde_json::to_vec_pretty(&manifest)
                .map_err(|err| IsolationError::isolate(id.as_str(), err.to_string()))?;
            fs::write(component_root.join(MANIFEST_FILENAME), payload).await?;
        }

        if options.install_packages {
            if let Some(installer) = &self.installer {
                installer.install(&component_root, options.verbose).await?;
            }
        }

        component.set_isolation(&component_root);
        debug!(
            component_id = %id,
            dependencies = dependencies.len(),
            root = %component_root.display(),
            "isolated component"
        );
        Ok(IsolatedComponent {
            component,
            root: component_root,
        })
    }

    async fn destroy(&self) -> Result<(), IsolationError> {
        let Some(root) = self.root.lock().take() else {
            return Ok(());
        };
        let path = root.path().to_path_buf();
        tokio::task::spawn_blocking(move || root.close())
            .await
            .map_err(|err| IsolationError::Destroy {
                message: err.to_string(),
            })?
            .map_err(|err| IsolationError::Destroy {
                message: err.to_string(),
            })?;
        debug!(root = %path.display(), "destroyed isolated environment");
        Ok(())
    }

    fn retain(&self) {
        if let Some(root) = self.root.lock().take() {
            let path = root.keep();
            debug!(root = %path.display(), "retaining isolated environment");
        }
    }

    fn root(&self) -> Option<PathBuf> {
        self.root.lock().as_ref().map(|root| root.path().to_path_buf())
    }
}

/// Factory producing fresh [`LocalEnvironmentProvider`]s.
pub struct LocalEnvironmentFactory {
    source: Arc<dyn ComponentSource>,
    installer: Option<Arc<dyn PackageInstaller>>,
}

impl LocalEnvironmentFactory {
    /// Create a factory that resolves components through `source`.
    #[must_use]
    pub fn new(source: Arc<dyn ComponentSource>) -> Self {
        Self {
            source,
            installer: None,
        }
    }

    /// Install packages through `installer` in every produced environment.
    #[must_use]
    pub fn with_installer(mut self, installer: Arc<dyn PackageInstaller>) -> Self {
        self.installer = Some(installer);
        self
    }
}

impl EnvironmentFactory for LocalEnvironmentFactory {
    fn create_environment(
        &self,
        hint: Option<&Path>,
    ) -> Result<Arc<dyn EnvironmentProvider>, IsolationError> {
        let mut provider = LocalEnvironmentProvider::new(Arc::clone(&self.source));
        if let Some(installer) = &self.installer {
            provider = provider.with_installer(Arc::clone(installer));
        }
        if let Some(hint) = hint {
            provider = provider.with_hint(hint);
        }
        Ok(Arc::new(provider))
    }
}
