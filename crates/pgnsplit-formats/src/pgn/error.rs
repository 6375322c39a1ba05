//! Error types for PGN boundary detection

use thiserror::Error;

/// PGN operation result type
pub type PgnResult<T> = Result<T, PgnError>;

/// Errors raised while advancing through PGN text
#[derive(Debug, Error)]
pub enum PgnError {
    /// Underlying reader failed
    #[error("I/O error while reading PGN: {0}")]
    Io(#[from] std::io::Error),
}
