//! Error types and handling for sequence streams
//!
//! Every failure surfaces to the caller of the terminal operation that
//! triggered it. There is no recoverable/fatal split at this layer.

use thiserror::Error;

/// Main error type for stream operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A fold-style terminal operation found no elements and had no seed
    #[error("Empty sequence: no elements to aggregate")]
    EmptySequence,
    /// A predicate or mapper failed on an element
    #[error("Element operation failed: {0}")]
    ElementOperation(String),
    /// A constructor or combinator received an unusable argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Concurrently dispatched work did not finish in time
    #[error("Operation timed out")]
    Timeout,
    /// Concurrently dispatched work was cancelled before producing a result
    #[error("Operation cancelled")]
    Cancelled,
}

impl StreamError {
    /// Wrap any displayable failure raised by a per-element function
    pub fn element<E: std::fmt::Display>(err: E) -> Self {
        StreamError::ElementOperation(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for StreamError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        StreamError::Timeout
    }
}

impl From<tokio::task::JoinError> for StreamError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            StreamError::Cancelled
        } else {
            StreamError::ElementOperation(format!("worker panicked: {}", err))
        }
    }
}

/// Result type for stream operations
pub type StreamResult<T> = Result<T, StreamError>;
