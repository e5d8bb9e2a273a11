//! Half-open index intervals and the bookkeeping for pulled-out internal buffers.

use crate::Either;
use contracts::*;
use std::ops;

/// A half-open interval `[start, end)` of indices into the slice being sorted.
///
/// Owns no elements. `start <= end` always holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    #[debug_requires(start <= end)]
    pub fn new(start: usize, end: usize) -> Self {
        Range { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[debug_requires(start <= end)]
    pub fn set(&mut self, start: usize, end: usize) {
        self.start = start;
        self.end = end;
    }

    pub fn as_range(&self) -> ops::Range<usize> {
        self.start..self.end
    }
}

/// Records where a run of `count` distinct values was collected inside `range`, so it can be
/// merged back once the level is done.
///
/// `from` is where the run started out, `to` is the edge of `range` it was moved to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pull {
    pub range: Range,
    pub from: usize,
    pub to: usize,
    pub count: usize,
}

impl Pull {
    /// Which edge of `range` the values were pulled to: `Left` for the start of an A subarray,
    /// `Right` for the end of a B subarray. `None` if nothing had to move.
    pub fn direction(&self) -> Option<Either> {
        use std::cmp::Ordering::*;

        match self.to.cmp(&self.from) {
            Less => Some(Either::Left(())),
            Greater => Some(Either::Right(())),
            Equal => None,
        }
    }
}
