//! Byte-range extraction
//!
//! Consecutive boundary offsets are paired with an overlap of one, and each
//! pair is read back from the input through a second, random-access handle.

use crate::error::{SplitError, SplitResult};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Raw bytes of one record, `[start, end)` in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    start: u64,
    data: Vec<u8>,
}

impl Block {
    /// Create a block starting at `start`
    pub fn new(start: u64, data: Vec<u8>) -> Self {
        Self { start, data }
    }

    /// Offset of the first byte in the input
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Offset one past the last byte in the input
    pub fn end(&self) -> u64 {
        self.start + self.byte_len()
    }

    /// Number of bytes in the block
    pub fn byte_len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Block contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Yields one [`Block`] per pair of consecutive offsets.
///
/// A zero-length pair carries no record and yields nothing, so `n` offsets
/// produce at most `n - 1` blocks. After an error the sequence ends.
#[derive(Debug)]
pub struct BlockExtractor<I, R> {
    offsets: I,
    reader: R,
    start: Option<u64>,
    done: bool,
}

impl<I> BlockExtractor<I, File>
where
    I: Iterator<Item = SplitResult<u64>>,
{
    /// Open an independent handle on `path` for random-access reads.
    ///
    /// The handle is owned by the extractor and released when it drops.
    pub fn open<P: AsRef<Path>>(path: P, offsets: I) -> SplitResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SplitError::InputAccess {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(file, offsets))
    }
}

impl<I, R> BlockExtractor<I, R>
where
    I: Iterator<Item = SplitResult<u64>>,
    R: Read + Seek,
{
    /// Extract from any seekable reader
    pub fn new(reader: R, offsets: I) -> Self {
        Self {
            offsets,
            reader,
            start: None,
            done: false,
        }
    }

    fn read_range(&mut self, start: u64, end: u64) -> SplitResult<Block> {
        let expected = end - start;
        let io_err = |source| SplitError::ExtractRead { start, source };

        self.reader.seek(SeekFrom::Start(start)).map_err(io_err)?;
        let mut data = Vec::with_capacity(usize::try_from(expected).unwrap_or(0));
        let received = self
            .reader
            .by_ref()
            .take(expected)
            .read_to_end(&mut data)
            .map_err(io_err)? as u64;

        if received != expected {
            return Err(SplitError::ShortRead {
                start,
                expected,
                received,
            });
        }
        Ok(Block::new(start, data))
    }

    /// Next offset, fusing the sequence on error
    fn next_offset(&mut self) -> Option<SplitResult<u64>> {
        let offset = self.offsets.next();
        if !matches!(offset, Some(Ok(_))) {
            self.done = true;
        }
        offset
    }
}

impl<I, R> Iterator for BlockExtractor<I, R>
where
    I: Iterator<Item = SplitResult<u64>>,
    R: Read + Seek,
{
    type Item = SplitResult<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut start = match self.start {
            Some(start) => start,
            None => match self.next_offset()? {
                Ok(start) => start,
                Err(err) => return Some(Err(err)),
            },
        };

        loop {
            let end = match self.next_offset()? {
                Ok(end) => end,
                Err(err) => return Some(Err(err)),
            };
            self.start = Some(end);

            if end < start {
                self.done = true;
                return Some(Err(SplitError::OffsetOrder { start, end }));
            }
            if end == start {
                start = end;
                continue;
            }

            let block = self.read_range(start, end);
            if block.is_err() {
                self.done = true;
            }
            return Some(block);
        }
    }
}

impl<I, R> std::iter::FusedIterator for BlockExtractor<I, R>
where
    I: Iterator<Item = SplitResult<u64>>,
    R: Read + Seek,
{
}
