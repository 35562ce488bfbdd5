//! Environment provider ports and the temporary-root allocator.
//!
//! An [`EnvironmentProvider`] owns one disposable environment: `create` it,
//! `isolate_component` into it, `destroy` it. Providers are single-use —
//! each concurrent provisioning gets its own provider (and thus its own
//! temporary root) from an [`EnvironmentFactory`], so concurrent calls never
//! collide.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use kiln_core::component::Component;
use kiln_core::ids::ComponentId;

use crate::errors::IsolationError;

/// Options controlling how a component is isolated.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IsolateOptions {
    /// Emit verbose output from isolation steps (package installation).
    pub verbose: bool,
    /// Install the dependency closure's packages. Enabled by default.
    pub install_packages: bool,
    /// Skip generating a manifest inside the environment.
    pub no_manifest: bool,
}

impl Default for IsolateOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            install_packages: true,
            no_manifest: false,
        }
    }
}

/// A component written into an isolated environment, with its on-disk root.
#[derive(Clone, Debug)]
pub struct IsolatedComponent {
    /// The component, with its isolation marker set.
    pub component: Component,
    /// Root directory the component was written to.
    pub root: PathBuf,
}

/// Port for one disposable isolated environment.
///
/// Every environment that is created must eventually be destroyed; the
/// lifecycle wrapper in [`provision`](crate::provision) enforces this on all
/// failure paths.
#[async_trait]
pub trait EnvironmentProvider: Send + Sync {
    /// Create the environment root.
    async fn create(&self) -> Result<(), IsolationError>;

    /// Write `id` and its transitive dependency closure into the
    /// environment.
    async fn isolate_component(
        &self,
        id: &ComponentId,
        options: &IsolateOptions,
    ) -> Result<IsolatedComponent, IsolationError>;

    /// Tear the environment down. Idempotent.
    async fn destroy(&self) -> Result<(), IsolationError>;

    /// Disarm automatic cleanup so the environment outlives the provider
    /// (diagnostic retention). Default: no-op.
    fn retain(&self) {}

    /// Root path of the environment, once created.
    fn root(&self) -> Option<PathBuf>;
}

/// Port handing out fresh single-use environment providers.
pub trait EnvironmentFactory: Send + Sync {
    /// Create a provider for one environment, rooted under `hint` when
    /// given.
    fn create_environment(
        &self,
        hint: Option<&Path>,
    ) -> Result<std::sync::Arc<dyn EnvironmentProvider>, IsolationError>;
}

/// A fresh temporary root directory, exclusively owned by one environment.
#[derive(Debug)]
pub struct TempRoot {
    dir: TempDir,
}

impl TempRoot {
    /// Allocate a fresh root, under `hint` when given, otherwise under the
    /// system temp directory.
    pub fn allocate(hint: Option<&Path>) -> io::Result<Self> {
        let dir = match hint {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                tempfile::Builder::new().prefix("kiln-env-").tempdir_in(parent)?
            }
            None => tempfile::Builder::new().prefix("kiln-env-").tempdir()?,
        };
        Ok(Self { dir })
    }

    /// Path of the root directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the root and everything under it.
    pub fn close(self) -> io::Result<()> {
        self.dir.close()
    }

    /// Disarm automatic removal and return the root's path. The directory
    /// is left on disk.
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }
}
