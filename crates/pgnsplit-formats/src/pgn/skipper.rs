//! Line-oriented game skipper

use crate::pgn::error::PgnResult;
use std::io::BufRead;
use tracing::trace;

/// UTF-8 byte order mark, tolerated at the start of a line
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Coarse classification of a single PGN line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    /// Only whitespace (including the line terminator)
    Blank,
    /// `%` in the first column: the rest of the line is ignored
    Escape,
    /// First non-whitespace byte is `[`
    Tag,
    /// Anything else, i.e. movetext
    Text,
}

impl LineKind {
    fn classify(line: &[u8]) -> Self {
        let line = line.strip_prefix(BOM).unwrap_or(line);
        match line.iter().position(|b| !b.is_ascii_whitespace()) {
            None => Self::Blank,
            Some(0) if line[0] == b'%' => Self::Escape,
            Some(i) if line[i] == b'[' => Self::Tag,
            Some(_) => Self::Text,
        }
    }
}

/// Scan one movetext line for comment delimiters.
///
/// Returns whether a `{` comment is still open at the end of the line. A `;`
/// outside a brace comment hides the rest of the line, braces included.
fn scan_movetext(line: &[u8], mut in_comment: bool) -> bool {
    for &byte in line {
        match (in_comment, byte) {
            (true, b'}') => in_comment = false,
            (false, b'{') => in_comment = true,
            (false, b';') => break,
            _ => {}
        }
    }
    in_comment
}

/// Advances a buffered reader one PGN game at a time.
///
/// The skipper reads whole lines and keeps at most one line of lookahead, so
/// memory use is bounded by the longest line in the input. Lines are handled
/// as raw bytes and need not be valid UTF-8.
///
/// [`position`](Self::position) is the offset of the first byte not yet
/// consumed, counted from where the reader stood when the skipper was created.
/// After a successful [`skip_game`](Self::skip_game) it is the start of the
/// next game (or the end of input); after an unsuccessful one it is the end of
/// input.
#[derive(Debug)]
pub struct GameSkipper<R> {
    reader: R,
    /// Lookahead line, valid while `pending` is set
    line: Vec<u8>,
    pending: bool,
    position: u64,
}

impl<R: BufRead> GameSkipper<R> {
    /// Create a skipper positioned at the start of `reader`
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            pending: false,
            position: 0,
        }
    }

    /// Byte offset of the first unconsumed byte
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// Advance past exactly one game.
    ///
    /// Returns `Ok(false)` when only blank and escape lines remain; those are
    /// consumed so that the position ends up at the end of input.
    pub fn skip_game(&mut self) -> PgnResult<bool> {
        // Leading blank and escape lines belong to nobody
        loop {
            match self.peek()? {
                None => return Ok(false),
                Some(LineKind::Blank | LineKind::Escape) => self.consume(),
                Some(LineKind::Tag | LineKind::Text) => break,
            }
        }

        // Escape lines and one blank line at a time may sit between tags
        let mut tags = 0usize;
        loop {
            match self.peek()? {
                Some(LineKind::Tag) => {
                    self.consume();
                    tags += 1;
                }
                Some(LineKind::Escape) => self.consume(),
                Some(LineKind::Blank) => {
                    self.consume();
                    if self.peek()? != Some(LineKind::Tag) {
                        break;
                    }
                }
                Some(LineKind::Text) | None => break,
            }
        }
        self.skip_blank_lines()?;

        if self.peek()? == Some(LineKind::Tag) {
            trace!(position = self.position, tags, "game has no movetext");
            return Ok(true);
        }

        let mut in_comment = false;
        while let Some(kind) = self.peek()? {
            if !in_comment {
                match kind {
                    LineKind::Blank => {
                        self.skip_blank_lines()?;
                        break;
                    }
                    LineKind::Tag => break,
                    LineKind::Escape | LineKind::Text => {}
                }
            }
            if in_comment || kind == LineKind::Text {
                in_comment = scan_movetext(&self.line, in_comment);
            }
            self.consume();
        }

        if in_comment {
            trace!(position = self.position, "input ended inside a comment");
        }
        Ok(true)
    }

    /// Classify the lookahead line, reading a new one if needed
    fn peek(&mut self) -> PgnResult<Option<LineKind>> {
        if !self.pending {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(None);
            }
            self.pending = true;
        }
        Ok(Some(LineKind::classify(&self.line)))
    }

    /// Accept the lookahead line as part of the current game
    fn consume(&mut self) {
        if self.pending {
            self.position += self.line.len() as u64;
            self.pending = false;
        }
    }

    fn skip_blank_lines(&mut self) -> PgnResult<()> {
        while self.peek()? == Some(LineKind::Blank) {
            self.consume();
        }
        Ok(())
    }
}
