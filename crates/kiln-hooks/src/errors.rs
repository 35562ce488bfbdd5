//! Hook error types.

use thiserror::Error;

/// Errors raised by the hook system.
#[derive(Debug, Error)]
pub enum HookError {
    /// An observer rejected its notification.
    #[error("observer '{name}' failed: {message}")]
    Observer {
        /// Observer name.
        name: String,
        /// Failure description.
        message: String,
    },

    /// The compile delegate failed while computing dists.
    #[error("compile failed for '{component_id}'")]
    CompileFailed {
        /// Component being compiled.
        component_id: String,
        /// Underlying build failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generic internal error.
    #[error("{0}")]
    Internal(String),
}

impl HookError {
    /// Wrap a build failure raised by the compile delegate.
    #[must_use]
    pub fn compile_failed(
        component_id: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::CompileFailed {
            component_id: component_id.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observer_display_names_observer() {
        let err = HookError::Observer {
            name: "tagger".into(),
            message: "nope".into(),
        };
        assert_eq!(err.to_string(), "observer 'tagger' failed: nope");
    }

    #[test]
    fn compile_failed_preserves_source() {
        let io_err = std::io::Error::other("disk full");
        let err = HookError::compile_failed("pkg/a", io_err);
        assert!(std::error::Error::source(&err).is_some());
    }
}
