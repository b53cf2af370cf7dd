//! Common result and error types for the physical design crates.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates a broken internal invariant (a bug in the engine), not a
/// user-facing problem. User-facing problems are reported through the
/// diagnostics sink or through the dedicated error enums of each crate.
pub type FcnResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in the engine, not a user input problem.
///
/// A satisfying model that does not extract into a connected layout is the
/// typical source of this error.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
