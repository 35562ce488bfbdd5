//! Isolation error types.

use std::io;

use thiserror::Error;

/// Errors raised while provisioning or tearing down an isolated environment.
#[derive(Debug, Error)]
pub enum IsolationError {
    /// Creating the environment root failed.
    #[error("failed to create isolated environment: {message}")]
    Create {
        /// Failure description.
        message: String,
    },

    /// Writing the component or its dependency closure failed.
    #[error("failed to isolate component '{component_id}': {message}")]
    Isolate {
        /// Component being isolated.
        component_id: String,
        /// Failure description.
        message: String,
    },

    /// Tearing the environment down failed.
    #[error("failed to destroy isolated environment: {message}")]
    Destroy {
        /// Failure description.
        message: String,
    },

    /// The operation was cancelled.
    #[error("isolation cancelled")]
    Cancelled,

    /// Generic I/O failure.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl IsolationError {
    /// Create an isolation failure for a component.
    #[must_use]
    pub fn isolate(component_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Isolate {
            component_id: component_id.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolate_display_names_component() {
        let err = IsolationError::isolate("pkg/a", "disk full");
        assert_eq!(
            err.to_string(),
            "failed to isolate component 'pkg/a': disk full"
        );
    }

    #[test]
    fn from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = IsolationError::from(io_err);
        assert!(err.to_string().contains("gone"));
    }
}
