//! Error types for the imagefs library.
//!
//! All fallible operations return [`Result<T>`], an alias for
//! `Result<T, UsageError>`. The taxonomy is deliberately small:
//!
//! - **Configuration errors**: [`ConfigResolution`]
//! - **Scan errors**: [`Traversal`], [`Cancelled`]
//!
//! Every variant is fatal to the request it occurs in: nothing is retried
//! or suppressed here, and a failed report never produces a partial usage
//! entry. [`Cancelled`] is distinguished from [`Traversal`] so callers can
//! tell "gave up" apart from "filesystem problem".
//!
//! [`ConfigResolution`]: UsageError::ConfigResolution
//! [`Traversal`]: UsageError::Traversal
//! [`Cancelled`]: UsageError::Cancelled

use std::path::PathBuf;

/// Result type alias for operations that may return a [`UsageError`].
pub type Result<T> = std::result::Result<T, UsageError>;

/// Error types for usage accounting operations.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    /// The runtime configuration could not supply a usable data root.
    #[error("cannot resolve engine data root: {0}")]
    ConfigResolution(String),

    /// An I/O error occurred while traversing the image store.
    #[error("traversal failed at {path}: {source}")]
    Traversal {
        /// The path at which the failure was observed.
        path: PathBuf,
        /// The underlying OS error.
        source: std::io::Error,
    },

    /// The caller cancelled the operation before the scan completed.
    #[error("scan cancelled")]
    Cancelled,
}

impl UsageError {
    /// Wrap an I/O error observed at `path` during traversal.
    pub(crate) fn traversal(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        UsageError::Traversal {
            path: path.into(),
            source,
        }
    }
}
