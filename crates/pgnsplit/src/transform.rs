//! Offset stream transformation.
//!
//! Three modifiers sit between the scanner and the extractor:
//!
//! - [`consume`] drops leading offsets, which skips records
//! - [`limit`] keeps `games + 1` offsets, enough to bound `games` records
//! - [`Observed`] reports progress for every item without altering it
//!
//! None of them buffer: each pulls one item from upstream per item produced.

use crate::error::SplitResult;
use crate::progress::Progress;

/// Pull and discard up to `n` offsets from `offsets`.
///
/// Returns how many offsets were actually discarded, which is less than `n`
/// when the sequence ran out. Errors met while skipping are returned
/// immediately.
pub fn consume<I>(offsets: &mut I, n: u64) -> SplitResult<u64>
where
    I: Iterator<Item = SplitResult<u64>>,
{
    let mut skipped = 0;
    while skipped < n {
        match offsets.next() {
            Some(offset) => {
                offset?;
                skipped += 1;
            }
            None => break,
        }
    }
    Ok(skipped)
}

/// Truncate `offsets` to the first `games + 1` items
pub fn limit<I>(offsets: I, games: u64) -> std::iter::Take<I>
where
    I: Iterator<Item = SplitResult<u64>>,
{
    let count = usize::try_from(games.saturating_add(1)).unwrap_or(usize::MAX);
    offsets.take(count)
}

/// Iterator adapter reporting a measure of every successful item to a
/// [`Progress`] sink.
pub struct Observed<'p, I, F> {
    inner: I,
    progress: &'p dyn Progress,
    measure: F,
}

impl<'p, I, F> Observed<'p, I, F> {
    /// Wrap `inner`, reporting `measure(item)` for each successful item
    pub fn new(inner: I, progress: &'p dyn Progress, measure: F) -> Self {
        Self {
            inner,
            progress,
            measure,
        }
    }
}

impl<I, T, F> Iterator for Observed<'_, I, F>
where
    I: Iterator<Item = SplitResult<T>>,
    F: FnMut(&T) -> u64,
{
    type Item = SplitResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        if let Ok(value) = &item {
            self.progress.advance((self.measure)(value));
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Report the forward byte delta between consecutive offsets.
///
/// The first observed offset is measured from `0`, so bytes dropped by a skip
/// are credited as soon as the first offset after them arrives.
pub fn observe_bytes<'p, I>(
    offsets: I,
    progress: &'p dyn Progress,
) -> Observed<'p, I, impl FnMut(&u64) -> u64>
where
    I: Iterator<Item = SplitResult<u64>>,
{
    let mut previous = 0u64;
    Observed::new(offsets, progress, move |offset: &u64| {
        let delta = offset.saturating_sub(previous);
        previous = previous.max(*offset);
        delta
    })
}

/// Report one unit per item
pub fn observe_count<'p, I, T>(
    items: I,
    progress: &'p dyn Progress,
) -> Observed<'p, I, impl FnMut(&T) -> u64>
where
    I: Iterator<Item = SplitResult<T>>,
{
    Observed::new(items, progress, |_: &T| 1)
}
