//! Build invocation options.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Options for one build request.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOptions {
    /// Persist the new dists through the store after a successful build.
    pub save: bool,
    /// Bypass the modification-based skip decision and always rebuild.
    pub no_cache: bool,
    /// Emit verbose output from isolation and config materialization.
    pub verbose: bool,
    /// Keep provisioned isolated environments after a successful build
    /// (diagnostic retention). Never honored on failure paths.
    pub keep: bool,
    /// Cooperative cancellation for the whole build.
    #[serde(skip)]
    pub cancel: CancellationToken,
}

impl BuildOptions {
    /// Options that force a rebuild.
    #[must_use]
    pub fn no_cache() -> Self {
        Self {
            no_cache: true,
            ..Self::default()
        }
    }
}
