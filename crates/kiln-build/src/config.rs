//! Detached compiler configuration.
//!
//! Some compilers cannot take their configuration in-memory and require it
//! on disk. For those, the executor materializes the declared config files
//! into a component-specific scratch directory before invocation and
//! removes the directory afterwards — success or failure.

use std::path::Path;

use tempfile::TempDir;
use tokio::fs;
use tracing::{debug, info};

use kiln_core::constants::CONFIG_SCRATCH_PREFIX;
use kiln_core::ids::ComponentId;

use crate::errors::BuildError;
use crate::traits::Compiler;

/// A scratch directory holding one compiler's materialized configuration.
///
/// Removal is guaranteed: [`remove`](ConfigScratch::remove) deletes the
/// directory explicitly, and dropping an un-removed scratch deletes it as
/// well, so no exit path leaks the directory.
#[derive(Debug)]
pub struct ConfigScratch {
    dir: TempDir,
}

impl ConfigScratch {
    /// Materialize the compiler's declared config files into a fresh
    /// scratch directory.
    ///
    /// The directory is created under `parent` when given, otherwise under
    /// the system temp directory, and is named after the component so
    /// concurrent builds of different components never share scratch space.
    pub async fn materialize(
        component_id: &ComponentId,
        compiler: &dyn Compiler,
        parent: Option<&Path>,
        verbose: bool,
    ) -> Result<Self, BuildError> {
        let prefix = format!(
            "{CONFIG_SCRATCH_PREFIX}-{}-",
            component_id.as_str().replace('/', "_")
        );
        let dir = match parent {
            Some(parent) => tempfile::Builder::new().prefix(&prefix).tempdir_in(parent)?,
            None => tempfile::Builder::new().prefix(&prefix).tempdir()?,
        };

        if verbose {
            info!(path = %dir.path().display(), "writing config files");
        }
        for file in compiler.config_files() {
            let path = dir.path().join(&file.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&path, &file.contents).await?;
        }
        debug!(
            component_id = %component_id,
            compiler = compiler.name(),
            path = %dir.path().display(),
            "materialized detached config"
        );
        Ok(Self { dir })
    }

    /// Path of the scratch directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the scratch directory.
    pub fn remove(self) {
        let path = self.dir.path().to_path_buf();
        info!(path = %path.display(), "deleting config scratch directory");
        if let Err(err) = self.dir.close() {
            debug!(path = %path.display(), error = %err, "config scratch removal failed");
        }
    }
}
