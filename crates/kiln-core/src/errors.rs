//! Shared error types for the build core.
//!
//! - [`ContractViolation`]: a compiler broke the compile-capability contract
//! - [`CompilerError`]: failure raised by a compiler plugin, possibly
//!   carrying several sub-errors
//! - [`StoreError`]: failure persisting build output through the store port

use std::io;

use thiserror::Error;

/// A compiler plugin violated the compile-capability contract.
///
/// Contract violations are fatal for the offending compiler and are never
/// retried.
#[derive(Debug, Error)]
pub enum ContractViolation {
    /// The compiler's response payload carried no files list.
    #[error("compiler '{compiler}' returned a response without a files list")]
    MissingFiles {
        /// Name of the offending compiler.
        compiler: String,
    },

    /// A returned file entry was malformed.
    #[error("compiler '{compiler}' returned an invalid file entry: {reason}")]
    InvalidFile {
        /// Name of the offending compiler.
        compiler: String,
        /// What was wrong with the entry.
        reason: String,
    },

    /// A returned file's contents are not string-coercible.
    #[error("compiler '{compiler}' returned non-text contents for '{path}'")]
    NonTextContents {
        /// Name of the offending compiler.
        compiler: String,
        /// Path of the offending file.
        path: String,
    },
}

/// Failure raised by a compiler plugin during compilation.
#[derive(Debug, Error)]
pub enum CompilerError {
    /// The compiler reported a single failure.
    #[error("{message}")]
    Failed {
        /// Failure description from the plugin.
        message: String,
    },

    /// The compiler reported several failures at once.
    #[error("{} compile errors", .0.len())]
    Many(Vec<CompilerError>),

    /// I/O failure inside the compiler.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl CompilerError {
    /// Create a single-message failure.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Flatten into the underlying leaf errors.
    ///
    /// A [`CompilerError::Many`] yields its children (recursively); any other
    /// variant yields itself.
    #[must_use]
    pub fn into_leaves(self) -> Vec<CompilerError> {
        match self {
            Self::Many(errors) => errors
                .into_iter()
                .flat_map(CompilerError::into_leaves)
                .collect(),
            other => vec![other],
        }
    }
}

/// Failure persisting a component's build output.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store rejected or failed the dist update.
    #[error("failed to persist dists for '{component_id}': {message}")]
    UpdateDist {
        /// Component whose dists could not be persisted.
        component_id: String,
        /// Failure description from the store.
        message: String,
    },

    /// I/O failure inside the store.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
