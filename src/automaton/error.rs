//! Error types for keyword tree lifecycle violations.

use thiserror::Error;

/// Errors raised when an operation is invoked in the wrong lifecycle phase.
///
/// Both variants are caller-usage violations. The tree is left unchanged
/// whenever one of them is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AutomatonError {
    /// `add()` or `finalize()` was called on a finalized tree.
    #[error("KeywordTree has been finalized. No more keyword additions or finalization allowed")]
    AlreadyFinalized,

    /// A search was started before `finalize()` was called.
    #[error("KeywordTree has not been finalized. No search allowed. Call finalize() first")]
    NotFinalized,
}

/// A specialized `Result` type for keyword tree operations.
pub type Result<T> = std::result::Result<T, AutomatonError>;
