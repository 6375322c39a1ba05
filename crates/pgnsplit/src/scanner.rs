//! Boundary scanning.
//!
//! The scanner makes one sequential pass over the input and yields the byte
//! offset of every record boundary: `0`, the start of each record after the
//! first, and finally the end of the input. The sequence is lazy, so the
//! cursor only advances as far as the consumer has asked for.
//!
//! ```text
//! input:    [ record 0 ][ record 1 ][ record 2 ]
//! offsets:  0           a           b           len
//! ```

use crate::error::{SplitError, SplitResult};
use pgnsplit_formats::pgn::{GameSkipper, PgnError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::trace;

/// Read buffer for the sequential scanning handle
pub const SCAN_BUFFER_SIZE: usize = 64 * 1024;

/// Capability to advance a cursor past one complete record.
///
/// This is the seam between the pipeline and the record grammar: the scanner
/// never looks at record contents itself.
pub trait RecordCursor {
    /// Advance past exactly one record, returning `false` when none remains
    fn advance(&mut self) -> std::io::Result<bool>;

    /// Byte offset of the cursor
    fn position(&self) -> u64;
}

impl<R: BufRead> RecordCursor for GameSkipper<R> {
    fn advance(&mut self) -> std::io::Result<bool> {
        self.skip_game().map_err(|err| match err {
            PgnError::Io(err) => err,
        })
    }

    fn position(&self) -> u64 {
        Self::position(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Start,
    Scanning,
    Done,
}

/// Lazy, forward-only sequence of record boundaries.
///
/// Offsets are strictly increasing, start at `0` and end at the cursor's final
/// position. The only repeated value is the `[0, 0]` produced by an input with
/// no bytes at all. After an error the sequence ends.
#[derive(Debug)]
pub struct BoundaryScanner<C> {
    cursor: C,
    state: ScanState,
    last: u64,
    records: u64,
}

impl BoundaryScanner<GameSkipper<BufReader<File>>> {
    /// Open `path` for sequential scanning of PGN games.
    ///
    /// The file handle is owned by the scanner and released when it drops.
    pub fn open<P: AsRef<Path>>(path: P) -> SplitResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SplitError::InputAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::with_capacity(SCAN_BUFFER_SIZE, file);
        Ok(Self::new(GameSkipper::new(reader)))
    }
}

impl<C: RecordCursor> BoundaryScanner<C> {
    /// Scan records using an arbitrary cursor
    pub fn new(cursor: C) -> Self {
        Self {
            cursor,
            state: ScanState::Start,
            last: 0,
            records: 0,
        }
    }

    /// Final offset, emitted unless it would repeat the previous one
    fn finish(&mut self) -> Option<SplitResult<u64>> {
        self.state = ScanState::Done;
        let end = self.cursor.position();
        if self.records == 0 || end > self.last {
            trace!(offset = end, "end of input");
            self.last = end;
            Some(Ok(end))
        } else {
            None
        }
    }
}

impl<C: RecordCursor> Iterator for BoundaryScanner<C> {
    type Item = SplitResult<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            ScanState::Start => {
                self.state = ScanState::Scanning;
                Some(Ok(0))
            }
            ScanState::Scanning => match self.cursor.advance() {
                Ok(true) => {
                    let position = self.cursor.position();
                    if position <= self.last {
                        // A record that takes no bytes cannot be split out
                        return self.finish();
                    }
                    self.records += 1;
                    trace!(offset = position, record = self.records, "record boundary");
                    self.last = position;
                    Some(Ok(position))
                }
                Ok(false) => self.finish(),
                Err(source) => {
                    self.state = ScanState::Done;
                    Some(Err(SplitError::BoundaryRead {
                        offset: self.last,
                        source,
                    }))
                }
            },
            ScanState::Done => None,
        }
    }
}

impl<C: RecordCursor> std::iter::FusedIterator for BoundaryScanner<C> {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    /// Cursor over a fixed list of record lengths
    struct FixedRecords {
        lengths: Vec<u64>,
        next: usize,
        position: u64,
        trailing: u64,
        fail_at: Option<usize>,
    }

    impl FixedRecords {
        fn new(lengths: &[u64], trailing: u64) -> Self {
            Self {
                lengths: lengths.to_vec(),
                next: 0,
                position: 0,
                trailing,
                fail_at: None,
            }
        }
    }

    impl RecordCursor for FixedRecords {
        fn advance(&mut self) -> std::io::Result<bool> {
            if self.fail_at == Some(self.next) {
                return Err(std::io::Error::other("boom"));
            }
            if let Some(len) = self.lengths.get(self.next) {
                self.next += 1;
                self.position += len;
                Ok(true)
            } else {
                self.position += self.trailing;
                self.trailing = 0;
                Ok(false)
            }
        }

        fn position(&self) -> u64 {
            self.position
        }
    }

    fn collect<C: RecordCursor>(scanner: BoundaryScanner<C>) -> Vec<u64> {
        scanner.map(Result::unwrap).collect()
    }

    #[test]
    fn test_offsets_for_fixed_records() {
        let scanner = BoundaryScanner::new(FixedRecords::new(&[10, 20, 5], 0));
        assert_eq!(collect(scanner), vec![0, 10, 30, 35]);
    }

    #[test]
    fn test_trailing_bytes_become_final_offset() {
        let scanner = BoundaryScanner::new(FixedRecords::new(&[10, 20], 3));
        assert_eq!(collect(scanner), vec![0, 10, 30, 33]);
    }

    #[test]
    fn test_no_records() {
        assert_eq!(
            collect(BoundaryScanner::new(FixedRecords::new(&[], 0))),
            vec![0, 0]
        );
        assert_eq!(
            collect(BoundaryScanner::new(FixedRecords::new(&[], 7))),
            vec![0, 7]
        );
    }

    #[test]
    fn test_zero_length_record_ends_scan() {
        let scanner = BoundaryScanner::new(FixedRecords::new(&[4, 0, 4], 0));
        assert_eq!(collect(scanner), vec![0, 4]);
    }

    #[test]
    fn test_error_ends_sequence() {
        let mut cursor = FixedRecords::new(&[4, 4, 4], 0);
        cursor.fail_at = Some(2);
        let mut scanner = BoundaryScanner::new(cursor);

        assert_eq!(scanner.next().unwrap().unwrap(), 0);
        assert_eq!(scanner.next().unwrap().unwrap(), 4);
        assert_eq!(scanner.next().unwrap().unwrap(), 8);
        match scanner.next() {
            Some(Err(SplitError::BoundaryRead { offset, .. })) => assert_eq!(offset, 8),
            other => panic!("expected boundary read error, got {other:?}"),
        }
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_read_failure_from_pgn_cursor() {
        struct FailingReader;

        impl std::io::Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"))
            }
        }

        let reader = std::io::BufReader::new(FailingReader);
        let mut scanner = BoundaryScanner::new(GameSkipper::new(reader));
        assert_eq!(scanner.next().unwrap().unwrap(), 0);
        match scanner.next() {
            Some(Err(SplitError::BoundaryRead { offset, source })) => {
                assert_eq!(offset, 0);
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected boundary read error, got {other:?}"),
        }
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_pgn_games() {
        let input = "[Event \"A\"]\n\n1. e4 1-0\n\n[Event \"B\"]\n\n1. d4 0-1\n";
        let scanner = BoundaryScanner::new(GameSkipper::new(Cursor::new(input)));
        assert_eq!(collect(scanner), vec![0, 24, input.len() as u64]);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BoundaryScanner::open(dir.path().join("missing.pgn")).unwrap_err();
        assert!(err.is_input_access());
    }
}
