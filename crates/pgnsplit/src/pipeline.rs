//! Split orchestration.
//!
//! ```text
//! BoundaryScanner → consume(skip) → limit(games) | observe_bytes
//!     → BlockExtractor → observe_count (if games) → Batches → BatchWriter
//! ```
//!
//! Every stage is a pull-based iterator, so the scanner never runs more than
//! one record ahead of the writer. The scanner and the extractor each own a
//! separate handle on the input; both are closed when the pipeline returns,
//! whether it finished or failed.

use crate::batch::{BatchWriter, Batches};
use crate::config::RunConfig;
use crate::error::{SplitError, SplitResult};
use crate::extract::{Block, BlockExtractor};
use crate::progress::{NoProgress, Progress, ProgressUnit};
use crate::scanner::BoundaryScanner;
use crate::transform::{consume, limit, observe_bytes, observe_count};
use std::path::{Path, PathBuf};
use tracing::info;

type Offsets<'a> = Box<dyn Iterator<Item = SplitResult<u64>> + 'a>;
type Blocks<'a> = Box<dyn Iterator<Item = SplitResult<Block>> + 'a>;

/// Outcome of a completed split
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSummary {
    /// Offsets dropped by the skip
    pub skipped: u64,
    /// Batches produced (files written, unless dry-run)
    pub batches: u64,
    /// Records across all batches
    pub records: u64,
    /// Bytes across all batches
    pub bytes: u64,
    /// Files written, in batch order; empty in dry-run mode
    pub files: Vec<PathBuf>,
}

/// Splits one archive according to a [`RunConfig`].
pub struct Splitter<'p> {
    config: RunConfig,
    progress: &'p dyn Progress,
}

impl Splitter<'static> {
    /// Create a splitter that reports no progress
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            progress: &NoProgress,
        }
    }
}

impl<'p> Splitter<'p> {
    /// Report progress to `progress`
    #[must_use]
    pub fn with_progress<'q>(self, progress: &'q dyn Progress) -> Splitter<'q> {
        Splitter {
            config: self.config,
            progress,
        }
    }

    /// Split `input` into numbered files in `output_dir`.
    pub fn split(&self, input: &Path, output_dir: &Path) -> SplitResult<SplitSummary> {
        self.config.validate()?;

        info!(
            input = %input.display(),
            output = %output_dir.display(),
            skip = ?self.config.skip,
            games = ?self.config.games,
            chunk_size = self.config.chunk_size,
            dry_run = self.config.dry_run,
            "splitting archive"
        );

        let mut scanner = BoundaryScanner::open(input)?;
        let skipped = consume(&mut scanner, self.config.skip.unwrap_or(0))?;

        let offsets: Offsets<'p> = match self.config.games {
            Some(games) => Box::new(limit(scanner, games)),
            None => {
                let total = std::fs::metadata(input)
                    .map_err(|source| SplitError::InputAccess {
                        path: input.to_path_buf(),
                        source,
                    })?
                    .len();
                self.progress.start(ProgressUnit::Bytes, total);
                Box::new(observe_bytes(scanner, self.progress))
            }
        };

        let extractor = BlockExtractor::open(input, offsets)?;
        let blocks: Blocks<'p> = match self.config.games {
            Some(games) => {
                self.progress.start(ProgressUnit::Records, games);
                Box::new(observe_count(extractor, self.progress))
            }
            None => Box::new(extractor),
        };

        let writer = BatchWriter::new(output_dir, &self.config.extension, self.config.dry_run);
        let mut summary = SplitSummary {
            skipped,
            ..SplitSummary::default()
        };
        for batch in Batches::new(blocks, self.config.chunk_size) {
            let batch = batch?;
            summary.batches += 1;
            summary.records += batch.records() as u64;
            summary.bytes += batch.byte_len();
            if let Some(path) = writer.write(&batch)? {
                summary.files.push(path);
            }
        }

        self.progress.finish();
        info!(
            batches = summary.batches,
            records = summary.records,
            bytes = summary.bytes,
            files = summary.files.len(),
            "split complete"
        );
        Ok(summary)
    }
}

/// Split `input` into `output_dir` without progress reporting
pub fn split(input: &Path, output_dir: &Path, config: RunConfig) -> SplitResult<SplitSummary> {
    Splitter::new(config).split(input, output_dir)
}
