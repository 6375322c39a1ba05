//! PGN game skipping
//!
//! A PGN archive is a sequence of games. Each game is an optional tag-pair
//! section (`[Name "value"]` lines) followed by movetext, and games are
//! separated by blank lines. [`GameSkipper`] advances a buffered reader past
//! exactly one game per call and reports the byte offset it stopped at.
//!
//! # Tolerance
//!
//! Any line that is neither blank nor a `%` escape line starts a game. Games
//! that are cut short (truncated movetext, an unterminated `{` comment, tags
//! without movetext) still count as one game each and end where the input
//! ends or where the next tag section begins. Nothing in the input is skipped
//! over silently: every byte belongs to some game or to the blank and escape
//! lines around it.
//!
//! Within a tag section, `%` escape lines are skipped and a single blank line
//! between two tag lines does not end the section. A game consisting only of
//! tags therefore needs at least two blank lines before the next tag section.

mod error;
mod skipper;

pub use error::{PgnError, PgnResult};
pub use skipper::GameSkipper;
