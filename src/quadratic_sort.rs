//! In-place sorting algorithms that take quadratic time.

use crate::Range;
use std::cmp::Ordering;

/// Stable insertion sort of `s[range]`.
///
/// Only used on the second internal buffer, which is at most `O(√n)` elements long and already
/// partially ordered after a level of merges.
pub fn insertion_sort<T>(s: &mut [T], range: Range, cmp: &mut impl FnMut(&T, &T) -> Ordering) {
    let v = &mut s[range.as_range()];

    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && cmp(&v[j], &v[j - 1]).is_lt() {
            v.swap(j, j - 1);
            j -= 1;
        }
    }
}
