//! Error types for the splitter.
//!
//! Every error is fatal for the run: nothing is retried and no output written
//! before the failure is rolled back.

use std::path::PathBuf;
use thiserror::Error;

/// Splitter result type
pub type SplitResult<T> = Result<T, SplitError>;

/// Errors raised while splitting an archive.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Input file missing, not a regular file, or unreadable
    #[error("Cannot read input {path}: {source}")]
    InputAccess {
        /// Input path as given
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Output folder missing, not a directory, or not writable
    #[error("Output folder {path} is not usable: {reason}")]
    OutputFolder {
        /// Output folder as given
        path: PathBuf,
        /// Reason the folder was rejected
        reason: String,
    },

    /// Run configuration rejected before any work started
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading failed while advancing past a record
    #[error("Failed to scan past the record starting at byte {offset}: {source}")]
    BoundaryRead {
        /// Last boundary emitted before the failure
        offset: u64,
        /// Underlying read error
        #[source]
        source: std::io::Error,
    },

    /// Boundary sequence went backwards
    #[error("Boundary offsets out of order: {start} followed by {end}")]
    OffsetOrder {
        /// Earlier offset
        start: u64,
        /// Later, smaller offset
        end: u64,
    },

    /// Fewer bytes were available than the scan promised
    #[error(
        "Short read at byte {start}: expected {expected} bytes, received {received}"
    )]
    ShortRead {
        /// Start of the record being extracted
        start: u64,
        /// Bytes between the two boundaries
        expected: u64,
        /// Bytes actually read
        received: u64,
    },

    /// Random-access read of a record failed
    #[error("Failed to read record at byte {start}: {source}")]
    ExtractRead {
        /// Start of the record being extracted
        start: u64,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Creating, writing or renaming a batch file failed
    #[error("Failed to write {path}: {source}")]
    OutputWrite {
        /// Batch file being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl SplitError {
    /// Whether the run failed before producing any output because an input
    /// or output location was unusable
    pub fn is_input_access(&self) -> bool {
        matches!(self, Self::InputAccess { .. } | Self::OutputFolder { .. })
    }

    /// Whether the scan and extraction passes disagreed about the input
    pub fn is_inconsistency(&self) -> bool {
        matches!(self, Self::ShortRead { .. } | Self::OffsetOrder { .. })
    }
}
