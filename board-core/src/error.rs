//! Error types for board operations.

use thiserror::Error;

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Errors that can occur in board operations.
///
/// Most user-driven failures (drops outside the canvas, invalid links,
/// unsupported file drops) are not errors at all; they are ignored and
/// logged. The variants here cover programming errors on the host side
/// and malformed external input.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Element not found in the scene store.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// An element with this id already exists.
    #[error("Duplicate element id: {0}")]
    DuplicateId(String),

    /// A content edit was dispatched to an element of the wrong type.
    #[error("Edit {edit} does not apply to {element_type} element {id}")]
    KindMismatch {
        /// Target element id.
        id: String,
        /// Actual element type tag.
        element_type: &'static str,
        /// Name of the rejected edit.
        edit: &'static str,
    },

    /// A snapshot document was structurally invalid.
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// Invalid board configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Snapshot or config serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File system error while reading or writing a snapshot.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
