//! Build error types.
//!
//! Unified error enum for the build pipeline. None of these are retried
//! inside the core; retry policy, if any, belongs to the caller. Cleanup of
//! temp directories and isolated environments always completes before an
//! error propagates.

use std::io;

use thiserror::Error;

use kiln_core::errors::{CompilerError, ContractViolation, StoreError};
use kiln_isolation::errors::IsolationError;

/// Failure reported by the workspace port.
#[derive(Debug, Error)]
#[error("workspace error: {message}")]
pub struct WorkspaceError {
    /// Failure description.
    pub message: String,
}

impl WorkspaceError {
    /// Create a workspace failure.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that can occur while building a component.
#[derive(Debug, Error)]
pub enum BuildError {
    /// No compiler was available although one was required.
    #[error("no compiler registered for '{component_id}'")]
    Configuration {
        /// Component that could not be built.
        component_id: String,
    },

    /// A compiler violated the compile-capability contract.
    #[error("invalid compiler contract: {0}")]
    Contract(#[from] ContractViolation),

    /// One or more compilers failed while building a component.
    #[error("build of '{component_id}' failed with {} error(s)", .errors.len())]
    Aggregated {
        /// Component whose build failed.
        component_id: String,
        /// The underlying compiler failures.
        errors: Vec<CompilerError>,
    },

    /// Provisioning or tearing down an isolated environment failed.
    #[error(transparent)]
    Isolation(#[from] IsolationError),

    /// Persisting dists through the store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The workspace port failed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// The build was cancelled.
    #[error("build cancelled")]
    Cancelled,

    /// Generic I/O failure.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl BuildError {
    /// Aggregate one-or-many compiler failures for a component.
    ///
    /// A [`CompilerError::Many`] is flattened so the aggregate carries leaf
    /// errors only.
    #[must_use]
    pub fn aggregated(component_id: impl Into<String>, error: CompilerError) -> Self {
        Self::Aggregated {
            component_id: component_id.into(),
            errors: error.into_leaves(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn aggregated_flattens_many_into_leaves() {
        let err = BuildError::aggregated(
            "pkg/a",
            CompilerError::Many(vec![
                CompilerError::failed("first"),
                CompilerError::failed("second"),
            ]),
        );
        assert_matches!(err, BuildError::Aggregated { component_id, errors } => {
            assert_eq!(component_id, "pkg/a");
            assert_eq!(errors.len(), 2);
        });
    }

    #[test]
    fn aggregated_display_counts_errors() {
        let err = BuildError::aggregated("pkg/a", CompilerError::failed("boom"));
        assert_eq!(err.to_string(), "build of 'pkg/a' failed with 1 error(s)");
    }

    #[test]
    fn isolation_errors_convert_transparently() {
        let err = BuildError::from(IsolationError::Cancelled);
        assert_eq!(err.to_string(), "isolation cancelled");
    }
}
