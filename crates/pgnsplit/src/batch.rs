//! Batching and output.
//!
//! [`Batches`] groups consecutive blocks into batches of up to `chunk_size`,
//! numbered from zero in emission order. [`BatchWriter`] turns each batch into
//! one output file named `<index>.<extension>`, or does nothing in dry-run
//! mode.
//!
//! # Atomicity
//!
//! A batch is written to `<index>.<extension>.tmp` in the output folder,
//! flushed, synced and then renamed over the final name. A run interrupted
//! mid-batch can leave the `.tmp` file behind, but never a truncated
//! `<index>.<extension>`. Existing files with the final name are replaced.

use crate::error::{SplitError, SplitResult};
use crate::extract::Block;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default number of records per output file
pub const DEFAULT_CHUNK_SIZE: usize = 1;

/// Default output file extension
pub const DEFAULT_EXTENSION: &str = "pgn";

/// Up to `chunk_size` consecutive blocks destined for one output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    index: u64,
    blocks: Vec<Block>,
}

impl Batch {
    /// Create a batch
    pub fn new(index: u64, blocks: Vec<Block>) -> Self {
        Self { index, blocks }
    }

    /// Zero-based position of this batch in the output
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Blocks in input order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of records in the batch
    pub fn records(&self) -> usize {
        self.blocks.len()
    }

    /// Total bytes across all blocks
    pub fn byte_len(&self) -> u64 {
        self.blocks.iter().map(Block::byte_len).sum()
    }

    /// Input byte range covered by the batch
    pub fn span(&self) -> Option<(u64, u64)> {
        let first = self.blocks.first()?;
        let last = self.blocks.last()?;
        Some((first.start(), last.end()))
    }
}

/// Groups a block sequence into numbered batches.
///
/// Only the batch being filled is held in memory. After an error the
/// sequence ends; blocks gathered for the failing batch are dropped.
#[derive(Debug)]
pub struct Batches<I> {
    blocks: I,
    chunk_size: usize,
    next_index: u64,
    done: bool,
}

impl<I> Batches<I>
where
    I: Iterator<Item = SplitResult<Block>>,
{
    /// Group `blocks` into batches of `chunk_size`; a zero size is treated as one
    pub fn new(blocks: I, chunk_size: usize) -> Self {
        Self {
            blocks,
            chunk_size: chunk_size.max(1),
            next_index: 0,
            done: false,
        }
    }
}

impl<I> Iterator for Batches<I>
where
    I: Iterator<Item = SplitResult<Block>>,
{
    type Item = SplitResult<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut blocks = Vec::with_capacity(self.chunk_size);
        while blocks.len() < self.chunk_size {
            match self.blocks.next() {
                Some(Ok(block)) => blocks.push(block),
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }

        if blocks.is_empty() {
            return None;
        }
        let batch = Batch::new(self.next_index, blocks);
        self.next_index += 1;
        Some(Ok(batch))
    }
}

impl<I> std::iter::FusedIterator for Batches<I> where I: Iterator<Item = SplitResult<Block>> {}

/// Writes batches to numbered files in an output folder
#[derive(Debug, Clone)]
pub struct BatchWriter {
    output_dir: PathBuf,
    extension: String,
    dry_run: bool,
}

impl BatchWriter {
    /// Create a writer targeting `output_dir`
    pub fn new<P: Into<PathBuf>>(output_dir: P, extension: &str, dry_run: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            extension: extension.to_string(),
            dry_run,
        }
    }

    /// Final path for batch `index`
    pub fn path_for(&self, index: u64) -> PathBuf {
        self.output_dir.join(format!("{index}.{}", self.extension))
    }

    fn temp_path_for(&self, index: u64) -> PathBuf {
        self.output_dir.join(format!("{index}.{}.tmp", self.extension))
    }

    /// Write `batch` to its file, returning the path written.
    ///
    /// Returns `Ok(None)` without touching the filesystem in dry-run mode.
    pub fn write(&self, batch: &Batch) -> SplitResult<Option<PathBuf>> {
        if self.dry_run {
            debug!(
                batch = batch.index(),
                records = batch.records(),
                bytes = batch.byte_len(),
                span = ?batch.span(),
                "dry run, batch not written"
            );
            return Ok(None);
        }

        let path = self.path_for(batch.index());
        let temp_path = self.temp_path_for(batch.index());
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| SplitError::OutputWrite { path, source }
        };

        {
            let file = File::create(&temp_path).map_err(io_err(&temp_path))?;
            let mut writer = BufWriter::new(file);
            for block in batch.blocks() {
                writer
                    .write_all(block.as_bytes())
                    .map_err(io_err(&temp_path))?;
            }
            let file = writer
                .into_inner()
                .map_err(|err| io_err(&temp_path)(err.into_error()))?;
            file.sync_all().map_err(io_err(&temp_path))?;
        }

        fs::rename(&temp_path, &path).map_err(io_err(&path))?;

        debug!(
            batch = batch.index(),
            records = batch.records(),
            bytes = batch.byte_len(),
            span = ?batch.span(),
            path = %path.display(),
            "batch written"
        );
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn blocks(parts: &[&str]) -> Vec<SplitResult<Block>> {
        let mut start = 0;
        parts
            .iter()
            .map(|part| {
                let block = Block::new(start, part.as_bytes().to_vec());
                start += part.len() as u64;
                Ok(block)
            })
            .collect()
    }

    fn batch_contents<I>(batches: Batches<I>) -> Vec<(u64, String)>
    where
        I: Iterator<Item = SplitResult<Block>>,
    {
        batches
            .map(|batch| {
                let batch = batch.unwrap();
                let bytes: Vec<u8> = batch
                    .blocks()
                    .iter()
                    .flat_map(|block| block.as_bytes().to_vec())
                    .collect();
                (batch.index(), String::from_utf8(bytes).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_batches_of_two() {
        let batches = Batches::new(blocks(&["a", "b", "c", "d", "e"]).into_iter(), 2);
        assert_eq!(
            batch_contents(batches),
            vec![
                (0, "ab".to_string()),
                (1, "cd".to_string()),
                (2, "e".to_string())
            ]
        );
    }

    #[test]
    fn test_batch_size_larger_than_input() {
        let batches = Batches::new(blocks(&["a", "b"]).into_iter(), 10);
        assert_eq!(batch_contents(batches), vec![(0, "ab".to_string())]);
    }

    #[test]
    fn test_zero_chunk_size_is_one() {
        let batches = Batches::new(blocks(&["a", "b"]).into_iter(), 0);
        assert_eq!(
            batch_contents(batches),
            vec![(0, "a".to_string()), (1, "b".to_string())]
        );
    }

    #[test]
    fn test_batch_span() {
        let mut batches = Batches::new(blocks(&["aa", "bbb", "c"]).into_iter(), 2);
        let first = batches.next().unwrap().unwrap();
        assert_eq!(first.span(), Some((0, 5)));
        assert_eq!(first.byte_len(), 5);
        let second = batches.next().unwrap().unwrap();
        assert_eq!(second.span(), Some((5, 6)));
        assert_eq!(Batch::new(9, Vec::new()).span(), None);
    }

    #[test]
    fn test_no_blocks_no_batches() {
        let mut batches = Batches::new(Vec::new().into_iter(), 3);
        assert!(batches.next().is_none());
    }

    #[test]
    fn test_error_ends_batching() {
        let mut input = blocks(&["a", "b", "c"]);
        input.insert(1, Err(SplitError::InvalidConfig("boom".to_string())));
        let mut batches = Batches::new(input.into_iter(), 2);
        assert!(batches.next().unwrap().is_err());
        assert!(batches.next().is_none());
    }

    #[test]
    fn test_writer_creates_numbered_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = BatchWriter::new(dir.path(), "pgn", false);
        let batch = Batch::new(
            3,
            vec![Block::new(0, b"one ".to_vec()), Block::new(4, b"two".to_vec())],
        );

        let path = writer.write(&batch).unwrap().unwrap();
        assert_eq!(path, dir.path().join("3.pgn"));
        assert_eq!(fs::read(&path).unwrap(), b"one two");
        assert!(!dir.path().join("3.pgn.tmp").exists());
    }

    #[test]
    fn test_writer_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("0.pgn"), b"stale contents that are longer").unwrap();

        let writer = BatchWriter::new(dir.path(), "pgn", false);
        writer
            .write(&Batch::new(0, vec![Block::new(0, b"fresh".to_vec())]))
            .unwrap();
        assert_eq!(fs::read(dir.path().join("0.pgn")).unwrap(), b"fresh");
    }

    #[test]
    fn test_writer_custom_extension() {
        let dir = tempfile::tempdir().unwrap();
        let writer = BatchWriter::new(dir.path(), "txt", false);
        assert_eq!(writer.path_for(7), dir.path().join("7.txt"));
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = BatchWriter::new(dir.path(), "pgn", true);
        let written = writer
            .write(&Batch::new(0, vec![Block::new(0, b"x".to_vec())]))
            .unwrap();
        assert!(written.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_output_dir_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let writer = BatchWriter::new(dir.path().join("gone"), "pgn", false);
        let err = writer
            .write(&Batch::new(0, vec![Block::new(0, b"x".to_vec())]))
            .unwrap_err();
        assert!(matches!(err, SplitError::OutputWrite { .. }));
    }
}
