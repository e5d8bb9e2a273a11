//! Merge two contiguous sequences using an internal buffer.
//!
//! The buffer is a region of the array whose contents may be freely permuted. Before the merge,
//! the elements of the left run are swapped into it. Each merged element is then swapped into
//! place, so the buffer gets back its original contents, but in a different order.

use crate::block::block_swap;
use crate::Range;
use contracts::*;
use std::cmp::Ordering;

/// Merges the run stored at the start of `buffer` with `s[b]`, writing the result to `s[a.start..b.end]`.
///
/// ```text
/// before:  |---buf(A)---|  ...  |--(junk)--|-----B-----|
///                                    a           b
/// after:   |---(junk)---|  ...  |--------A//B----------|
/// ```
///
/// Elements of A win ties, so the merge is stable.
#[debug_requires(a.end == b.start && b.end <= s.len())]
#[debug_requires(buffer.len() >= a.len())]
#[debug_requires(buffer.end <= a.start || b.end <= buffer.start)]
pub fn merge_internal<T>(
    s: &mut [T],
    a: Range,
    b: Range,
    buffer: Range,
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) {
    let mut a_count = 0;
    let mut b_count = 0;
    let mut insert = 0;

    if !a.is_empty() && !b.is_empty() {
        loop {
            if cmp(&s[b.start + b_count], &s[buffer.start + a_count]).is_ge() {
                s.swap(a.start + insert, buffer.start + a_count);
                a_count += 1;
                insert += 1;
                if a_count >= a.len() {
                    break;
                }
            } else {
                s.swap(a.start + insert, b.start + b_count);
                b_count += 1;
                insert += 1;
                if b_count >= b.len() {
                    break;
                }
            }
        }
    }

    // Whatever is left of A goes right after the merged prefix.
    block_swap(s, buffer.start + a_count, a.start + insert, a.len() - a_count);
}
