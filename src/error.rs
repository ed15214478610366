//! Error types for primr

use thiserror::Error;

/// Result type alias using primr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in primr operations
#[derive(Error, Debug)]
pub enum Error {
    /// Out of memory
    #[error("Out of memory: failed to allocate {size} bytes")]
    OutOfMemory {
        /// Requested size in bytes
        size: usize,
    },

    /// Index out of bounds
    #[error("Index {index} out of bounds for {what} of size {size}")]
    IndexOutOfBounds {
        /// The invalid index
        index: usize,
        /// Size of the indexed range
        size: usize,
        /// What was being indexed (buffer name, "bitset", ...)
        what: &'static str,
    },

    /// Buffer length does not match the expected element count
    #[error("Length mismatch for '{arg}': expected {expected}, got {got}")]
    LengthMismatch {
        /// The argument name
        arg: &'static str,
        /// Expected element count
        expected: usize,
        /// Actual element count
        got: usize,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Backend-specific error (kernel launch or execution failure)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Internal invariant violation
    ///
    /// Indicates a logic defect in the library or its caller's state
    /// handling, not a resource problem. Never recovered locally.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an out-of-bounds error for a named range
    pub fn out_of_bounds(index: usize, size: usize, what: &'static str) -> Self {
        Self::IndexOutOfBounds { index, size, what }
    }

    /// Create a length mismatch error
    pub fn length_mismatch(arg: &'static str, expected: usize, got: usize) -> Self {
        Self::LengthMismatch { arg, expected, got }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Create an internal invariant violation error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
