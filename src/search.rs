//! Binary and galloping searches over a sorted sub-range of a slice.
//!
//! All searches take the value to look for by reference, so it may (and usually does) live in the
//! same slice that is being searched.

use crate::Range;
use contracts::*;
use std::cmp::Ordering;

/// Returns the smallest index in `range` for which `is_before(&s[i])` returns `false`, or
/// `range.end` if no such index exists.
///
/// `s[range]` must be partitioned such that `is_before` returns `true` for some prefix and `false`
/// for the rest (e.g. `[TTTT TFFF FFFF]`).
#[debug_requires(range.end <= s.len())]
#[debug_ensures(range.start <= ret && ret <= range.end)]
fn binary_search_range<T>(s: &[T], range: Range, mut is_before: impl FnMut(&T) -> bool) -> usize {
    let mut lo = range.start;
    let mut hi = range.end;

    while lo < hi {
        // Compute `lo + hi` / 2 without overflow.
        let mid = lo + (hi - lo) / 2;

        if is_before(&s[mid]) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    lo
}

/// Returns the index of the first element in `range` that is not less than `value`.
pub fn binary_first<T>(
    s: &[T],
    value: &T,
    range: Range,
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) -> usize {
    binary_search_range(s, range, |x| cmp(x, value).is_lt())
}

/// Returns the index one past the last element in `range` that is not greater than `value`.
pub fn binary_last<T>(
    s: &[T],
    value: &T,
    range: Range,
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) -> usize {
    binary_search_range(s, range, |x| cmp(value, x).is_ge())
}

/// The stride used by the galloping searches.
///
/// `unique` estimates how many distinct values are left in `range`. The more there are, the
/// closer together the probes need to be.
fn skip(range: Range, unique: usize) -> usize {
    (range.len() / unique.max(1)).max(1)
}

/// Same as [`binary_first`], but probes forward from `range.start` in strides of
/// `range.len() / unique` before binary searching.
#[debug_requires(range.end <= s.len())]
#[debug_ensures(range.start <= ret && ret <= range.end)]
pub fn find_first_forward<T>(
    s: &[T],
    value: &T,
    range: Range,
    unique: usize,
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) -> usize {
    if range.is_empty() {
        return range.start;
    }

    let skip = skip(range, unique);
    let mut index = range.start + skip;

    while cmp(&s[index - 1], value).is_lt() {
        if index >= range.end - skip {
            return binary_first(s, value, Range::new(index, range.end), cmp);
        }
        index += skip;
    }

    binary_first(s, value, Range::new(index - skip, index), cmp)
}

/// Same as [`binary_last`], but probes forward from `range.start`.
#[debug_requires(range.end <= s.len())]
#[debug_ensures(range.start <= ret && ret <= range.end)]
pub fn find_last_forward<T>(
    s: &[T],
    value: &T,
    range: Range,
    unique: usize,
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) -> usize {
    if range.is_empty() {
        return range.start;
    }

    let skip = skip(range, unique);
    let mut index = range.start + skip;

    while cmp(value, &s[index - 1]).is_ge() {
        if index >= range.end - skip {
            return binary_last(s, value, Range::new(index, range.end), cmp);
        }
        index += skip;
    }

    binary_last(s, value, Range::new(index - skip, index), cmp)
}

/// Same as [`binary_first`], but probes backward from `range.end`.
#[debug_requires(range.end <= s.len())]
#[debug_ensures(range.start <= ret && ret <= range.end)]
pub fn find_first_backward<T>(
    s: &[T],
    value: &T,
    range: Range,
    unique: usize,
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) -> usize {
    if range.is_empty() {
        return range.start;
    }

    let skip = skip(range, unique);
    let mut index = range.end - skip;

    while index > range.start && cmp(&s[index - 1], value).is_ge() {
        if index < range.start + skip {
            return binary_first(s, value, Range::new(range.start, index), cmp);
        }
        index -= skip;
    }

    binary_first(s, value, Range::new(index, index + skip), cmp)
}

/// Same as [`binary_last`], but probes backward from `range.end`.
#[debug_requires(range.end <= s.len())]
#[debug_ensures(range.start <= ret && ret <= range.end)]
pub fn find_last_backward<T>(
    s: &[T],
    value: &T,
    range: Range,
    unique: usize,
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) -> usize {
    if range.is_empty() {
        return range.start;
    }

    let skip = skip(range, unique);
    let mut index = range.end - skip;

    while index > range.start && cmp(value, &s[index - 1]).is_lt() {
        if index < range.start + skip {
            return binary_last(s, value, Range::new(range.start, index), cmp);
        }
        index -= skip;
    }

    binary_last(s, value, Range::new(index, index + skip), cmp)
}
