//! Error types for cursor operations.

use thiserror::Error;

/// Result type for cursor operations.
pub type CursorResult<T> = Result<T, CursorError>;

/// Errors that can occur while driving a cursor.
#[derive(Debug, Error)]
pub enum CursorError {
    /// The cursor (or the resource behind it) was closed.
    ///
    /// Carries the cause recorded by the first `close` call.
    #[error("cursor is closed: {cause}")]
    Closed {
        /// The cause stored when the cursor was closed.
        cause: String,
    },

    /// `get` was called while the cursor was not positioned on an element.
    #[error("cursor not positioned on an element: {operation}")]
    InvalidPosition {
        /// The operation that found the cursor off-element.
        operation: &'static str,
    },

    /// The cursor's success flag and its position tracking disagree.
    ///
    /// This is always a defect in the cursor or its backing browser and
    /// must fail loudly rather than return stale data.
    #[error("cursor state inconsistent: {message}")]
    InconsistentState {
        /// Description of the divergence.
        message: String,
    },

    /// The operation is not supported by this cursor.
    ///
    /// Raised by `before`/`after` when no comparator was supplied, and by
    /// key seeks on browsers that do not implement them.
    #[error("unsupported cursor operation: {operation}")]
    Unsupported {
        /// The operation that is unsupported.
        operation: &'static str,
    },

    /// A list cursor was constructed with an invalid index range.
    #[error("index range [{start}, {end}) invalid for sequence of length {len}")]
    OutOfBounds {
        /// Requested start index (inclusive).
        start: usize,
        /// Requested end index (exclusive).
        end: usize,
        /// Length of the backing sequence.
        len: usize,
    },

    /// An I/O error from the underlying storage engine.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CursorError {
    /// Creates an inconsistent-state error.
    pub fn inconsistent(message: impl Into<String>) -> Self {
        Self::InconsistentState {
            message: message.into(),
        }
    }
}
