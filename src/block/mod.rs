//! Reversal, block swaps and rotations on index ranges of a slice.

use crate::{Either, Range};
use contracts::*;

pub mod roll;

/// Reverses the elements in `range`.
pub fn reverse<T>(s: &mut [T], range: Range) {
    s[range.as_range()].reverse();
}

/// Swaps the `len` elements starting at `start1` with the `len` elements starting at `start2`.
///
/// The two blocks must not overlap unless they are identical, in which case this is a no-op.
#[debug_requires(start1 == start2 || start1 + len <= start2 || start2 + len <= start1)]
pub fn block_swap<T>(s: &mut [T], start1: usize, start2: usize, len: usize) {
    if start1 == start2 || len == 0 {
        return;
    }

    let (lo, hi) = if start1 < start2 {
        (start1, start2)
    } else {
        (start2, start1)
    };

    let (left, right) = s.split_at_mut(hi);
    left[lo..][..len].swap_with_slice(&mut right[..len]);
}

/// Rotates `range` left (`Either::Left(n)`) or right (`Either::Right(n)`) by `n` places.
///
/// ```text
///  rotate left by 1:   [0 1 2 3] -> [1 2 3 0]
///  rotate right by 1:  [0 1 2 3] -> [3 0 1 2]
/// ```
///
/// This is done with three reversals, so it needs no scratch space and touches every element of
/// `range` twice.
#[debug_requires(amount.into_inner() <= range.len())]
pub fn rotate<T>(s: &mut [T], amount: Either<usize>, range: Range) {
    if range.is_empty() {
        return;
    }

    let split = match amount {
        Either::Left(n) => range.start + n,
        Either::Right(n) => range.end - n,
    };

    reverse(s, Range::new(range.start, split));
    reverse(s, Range::new(split, range.end));
    reverse(s, range);
}
