//! Error types for capitula.
//!
//! This module defines the error types returned by segmentation operations.

/// Error type for segmentation operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading the source document from disk failed.
    #[error("reading source document failed: {0}")]
    Io(#[from] std::io::Error),

    /// The source markup could not be turned into a tree.
    ///
    /// The bundled parser is lenient and does not produce this itself; the
    /// variant exists for callers that feed capitula from a stricter
    /// upstream parse.
    #[error("markup parsing failed: {0}")]
    Parse(String),
}

/// Result type alias for segmentation operations.
pub type Result<T> = std::result::Result<T, Error>;
