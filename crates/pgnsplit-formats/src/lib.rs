//! Record boundary detection for PGN game archives
//!
//! This crate knows just enough of the PGN (Portable Game Notation) grammar to
//! tell where one game ends and the next begins. It never builds a game tree,
//! validates moves or interprets tag values: callers that only need byte
//! boundaries should not pay for a full parser.
//!
//! # Example
//!
//! ```rust
//! use pgnsplit_formats::pgn::GameSkipper;
//! use std::io::Cursor;
//!
//! let archive = "[Event \"A\"]\n\n1. e4 e5 1-0\n\n[Event \"B\"]\n\n1. d4 0-1\n";
//! let mut skipper = GameSkipper::new(Cursor::new(archive));
//!
//! assert!(skipper.skip_game()?);
//! assert_eq!(skipper.position(), 27);
//! assert!(skipper.skip_game()?);
//! assert!(!skipper.skip_game()?);
//! assert_eq!(skipper.position(), archive.len() as u64);
//! # Ok::<(), pgnsplit_formats::pgn::PgnError>(())
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

/// PGN game boundary detection
pub mod pgn;
