//! Streaming splitter for PGN game archives.
//!
//! This crate re-partitions a large archive of concatenated PGN games into
//! numbered output files without loading the archive into memory. A single
//! forward pass finds the byte offset of every game boundary, and the bytes
//! between consecutive boundaries are copied verbatim into batch files.
//!
//! # Architecture
//!
//! - `scanner`: lazy boundary offsets from one sequential pass
//! - `transform`: skip, limit and progress observation over offsets
//! - `extract`: byte ranges read back through a second, seekable handle
//! - `batch`: grouping into numbered batches and writing output files
//! - `pipeline`: composition of the stages above
//! - `config`: command-line surface and per-run configuration
//! - `progress`: explicit progress sinks
//!
//! # Example
//!
//! ```no_run
//! use pgnsplit::{RunConfig, Splitter};
//! use std::path::Path;
//!
//! let config = RunConfig::default().with_skip(100).with_games(50).with_chunk_size(10);
//! let summary = Splitter::new(config).split(Path::new("archive.pgn"), Path::new("out"))?;
//! println!("wrote {} files", summary.files.len());
//! # Ok::<(), pgnsplit::SplitError>(())
//! ```

#![warn(missing_docs)]
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]

pub mod batch;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod progress;
pub mod scanner;
pub mod transform;

// Re-exports for public API
pub use batch::{Batch, BatchWriter, Batches};
pub use config::{LogLevel, RunConfig, SplitConfig};
pub use error::{SplitError, SplitResult};
pub use extract::{Block, BlockExtractor};
pub use pipeline::{SplitSummary, Splitter, split};
pub use progress::{CountingProgress, NoProgress, Progress, ProgressUnit};
pub use scanner::{BoundaryScanner, RecordCursor};
