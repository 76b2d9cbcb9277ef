//! Error types for DirStore core.

use dirstore_cursor::CursorError;
use std::io;
use thiserror::Error;

/// Result type for table, master-table and index operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in DirStore core operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A cursor-level failure (closed resource, invalid position,
    /// inconsistent state, unsupported seek).
    #[error("cursor error: {0}")]
    Cursor(#[from] CursorError),

    /// An invariant was violated by a bulk mutation.
    ///
    /// Bulk `put`/`remove` of more than one value against a table without
    /// duplicate keys reports this and applies nothing.
    #[error("invalid state: {message}")]
    InvalidState {
        /// Description of the violated invariant.
        message: String,
    },

    /// The operation requires a capability this table does not have,
    /// such as sorted-duplicate support.
    #[error("unsupported table operation: {operation}")]
    Unsupported {
        /// The operation that is unsupported.
        operation: &'static str,
    },

    /// A persisted property is malformed.
    #[error("corrupted store state: {message}")]
    Corrupted {
        /// Description of the corruption.
        message: String,
    },

    /// An I/O error from the underlying storage engine.
    ///
    /// Propagated untouched; retry policy belongs to the caller.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    /// Creates an invalid-state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Creates a corrupted-state error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted {
            message: message.into(),
        }
    }
}
