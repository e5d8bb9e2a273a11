//! Merges that go through the external cache.
//!
//! The cache is a slice of uninitialized storage. Elements are copied into it bitwise, so for the
//! duration of a merge every element exists twice: once in the cache and once in the array. Only
//! one of the two copies is ever treated as live. If the comparator panics partway through a
//! merge, a [`MergeHole`] copies whatever has not been merged yet into the gap in the destination,
//! so the array always ends up holding each element exactly once.

use crate::Range;
use contracts::*;
use std::cmp::Ordering;
use std::mem::MaybeUninit;
use std::ptr;

/// Two partially consumed runs and the place the next merged element goes.
///
/// When dropped, copies what is left of the left run to `dest`, followed by what is left of the
/// right run.
struct MergeHole<T> {
    left: *const T,
    left_end: *const T,
    right: *const T,
    right_end: *const T,
    dest: *mut T,
}

impl<T> Drop for MergeHole<T> {
    fn drop(&mut self) {
        unsafe {
            let left_len = self.left_end.offset_from(self.left) as usize;
            let right_len = self.right_end.offset_from(self.right) as usize;

            // The right run may already sit where it belongs, so this must be a `memmove`.
            ptr::copy(self.left, self.dest, left_len);
            ptr::copy(self.right, self.dest.add(left_len), right_len);
        }
    }
}

/// Merges the runs `left[..left_len]` and `right[..right_len]` into `dest`, taking from the left
/// run on ties.
///
/// # Safety
///
/// All three pointers must be valid for their lengths. `dest` must not overlap the left run, and
/// may only overlap the right run if `dest + left_len == right`.
unsafe fn merge_runs<T>(
    left: *const T,
    left_len: usize,
    right: *const T,
    right_len: usize,
    dest: *mut T,
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) {
    let mut hole = MergeHole {
        left,
        left_end: left.add(left_len),
        right,
        right_end: right.add(right_len),
        dest,
    };

    while hole.left < hole.left_end && hole.right < hole.right_end {
        let from = if cmp(&*hole.right, &*hole.left).is_lt() {
            &mut hole.right
        } else {
            &mut hole.left
        };

        ptr::copy_nonoverlapping(*from, hole.dest, 1);
        *from = (*from).add(1);
        hole.dest = hole.dest.add(1);
    }

    // `hole` is dropped here, moving the rest of the unfinished run into place.
}

/// Merges `src[a]` and `src[b]` into `dest[..a.len() + b.len()]`.
///
/// # Safety
///
/// `src` must be valid for reads up to `b.end`, `dest` for writes of `a.len() + b.len()` elements,
/// and the two allocations must be distinct.
unsafe fn merge_into<T>(
    src: *const T,
    a: Range,
    b: Range,
    dest: *mut T,
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) {
    merge_runs(src.add(a.start), a.len(), src.add(b.start), b.len(), dest, cmp);
}

/// Merges the adjacent sorted runs `s[a]` and `s[b]` by first copying `a` into the cache.
#[debug_requires(a.end == b.start && b.end <= s.len())]
#[debug_requires(a.len() <= cache.len())]
pub fn merge_external<T>(
    s: &mut [T],
    a: Range,
    b: Range,
    cache: &mut [MaybeUninit<T>],
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) {
    if a.is_empty() || b.is_empty() {
        return;
    }

    unsafe {
        let arr = s.as_mut_ptr();
        let buf = cache.as_mut_ptr() as *mut T;

        ptr::copy_nonoverlapping(arr.add(a.start), buf, a.len());
        merge_runs(buf, a.len(), arr.add(b.start), b.len(), arr.add(a.start), cmp);
    }
}

/// Merges two adjacent pairs of sorted runs, `a1`/`b1` and `a2`/`b2`, in a single trip through the
/// cache.
///
/// Each pair is merged into the cache, then the two results are merged back into the array. If
/// all four runs are already in order, nothing is moved.
#[debug_requires(a1.end == b1.start && b1.end == a2.start && a2.end == b2.start)]
#[debug_requires(b2.end <= s.len())]
#[debug_requires(!a1.is_empty() && !b1.is_empty() && !a2.is_empty() && !b2.is_empty())]
#[debug_requires(b2.end - a1.start <= cache.len())]
pub fn merge_pairs_via_cache<T>(
    s: &mut [T],
    a1: Range,
    b1: Range,
    a2: Range,
    b2: Range,
    cache: &mut [MaybeUninit<T>],
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) {
    unsafe {
        let arr = s.as_mut_ptr();
        let buf = cache.as_mut_ptr() as *mut T;

        // Nothing is written to the array until both pairs are in the cache.
        if cmp(at(arr, b1.end - 1), at(arr, a1.start)).is_lt() {
            ptr::copy_nonoverlapping(arr.add(a1.start), buf.add(b1.len()), a1.len());
            ptr::copy_nonoverlapping(arr.add(b1.start), buf, b1.len());
        } else if cmp(at(arr, b1.start), at(arr, a1.end - 1)).is_lt() {
            merge_into(arr, a1, b1, buf, cmp);
        } else {
            if cmp(at(arr, b2.start), at(arr, a2.end - 1)).is_ge()
                && cmp(at(arr, a2.start), at(arr, b1.end - 1)).is_ge()
            {
                return;
            }

            ptr::copy_nonoverlapping(arr.add(a1.start), buf, b1.end - a1.start);
        }

        let first = b1.end - a1.start;
        let second = b2.end - a2.start;
        let out = buf.add(first);

        if cmp(at(arr, b2.end - 1), at(arr, a2.start)).is_lt() {
            ptr::copy_nonoverlapping(arr.add(a2.start), out.add(b2.len()), a2.len());
            ptr::copy_nonoverlapping(arr.add(b2.start), out, b2.len());
        } else if cmp(at(arr, b2.start), at(arr, a2.end - 1)).is_lt() {
            merge_into(arr, a2, b2, out, cmp);
        } else {
            ptr::copy_nonoverlapping(arr.add(a2.start), out, second);
        }

        let dest = arr.add(a1.start);
        let a3 = Range::new(0, first);
        let b3 = Range::new(first, first + second);

        if cmp(at(buf, b3.end - 1), at(buf, a3.start)).is_lt() {
            ptr::copy_nonoverlapping(buf.add(a3.start), dest.add(second), first);
            ptr::copy_nonoverlapping(buf.add(b3.start), dest, second);
        } else if cmp(at(buf, b3.start), at(buf, a3.end - 1)).is_lt() {
            merge_into(buf, a3, b3, dest, cmp);
        } else {
            ptr::copy_nonoverlapping(buf, dest, first + second);
        }
    }
}

#[inline(always)]
unsafe fn at<'a, T>(p: *const T, i: usize) -> &'a T {
    &*p.add(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        cmp_ignore_idx, merge_by_naive, sorted_pair, sorted_pair_nonempty, KeyAndIndex,
    };
    use proptest::prelude::*;
    use std::panic::{self, AssertUnwindSafe};

    fn cache_for<T>(len: usize) -> Vec<MaybeUninit<T>> {
        std::iter::repeat_with(MaybeUninit::uninit).take(len).collect()
    }

    proptest! {
        #[test]
        fn merge_external(pair in sorted_pair(0..100, 0u8..10)) {
            let mid = pair.mid;
            let pair = pair.map_seq(KeyAndIndex::map_vec);
            let (l, r) = pair.split();
            let expect = merge_by_naive(l, r, &mut cmp_ignore_idx);

            let mut actual = pair.seq.clone();
            let len = actual.len();
            let mut cache = cache_for::<KeyAndIndex<u8>>(mid);
            super::merge_external(
                &mut actual,
                Range::new(0, mid),
                Range::new(mid, len),
                &mut cache,
                &mut cmp_ignore_idx,
            );

            prop_assert_eq!(actual, expect);
        }

        #[test]
        fn merge_pairs_via_cache(
            p1 in sorted_pair_nonempty(2..40, 0u8..6),
            p2 in sorted_pair_nonempty(2..40, 0u8..6),
        ) {
            let (m1, m2) = (p1.mid, p2.mid);
            let (n1, n2) = (p1.seq.len(), p2.seq.len());

            let mut seq = p1.seq;
            seq.extend(p2.seq);
            let seq = KeyAndIndex::map_vec(seq);

            let mut expect = seq.clone();
            expect.sort_by(cmp_ignore_idx);

            let mut actual = seq;
            let mut cache = cache_for::<KeyAndIndex<u8>>(n1 + n2);
            super::merge_pairs_via_cache(
                &mut actual,
                Range::new(0, m1),
                Range::new(m1, n1),
                Range::new(n1, n1 + m2),
                Range::new(n1 + m2, n1 + n2),
                &mut cache,
                &mut cmp_ignore_idx,
            );

            prop_assert_eq!(actual, expect);
        }
    }

    #[test]
    fn merge_pairs_already_in_order() {
        let mut v: Vec<u8> = (0..16).collect();
        let mut calls = 0;
        let mut cache = cache_for::<u8>(16);
        super::merge_pairs_via_cache(
            &mut v,
            Range::new(0, 4),
            Range::new(4, 8),
            Range::new(8, 12),
            Range::new(12, 16),
            &mut cache,
            &mut |a, b| {
                calls += 1;
                a.cmp(b)
            },
        );

        assert_eq!(v, (0..16).collect::<Vec<_>>());
        assert_eq!(calls, 4);
    }

    #[test]
    fn panicking_comparator_leaves_a_permutation() {
        let input: Vec<String> = [3, 7, 9, 12, 1, 2, 8, 10, 11]
            .iter()
            .map(|x| x.to_string())
            .collect();

        for limit in 0..8 {
            let mut v = input.clone();
            let mut cache = cache_for::<String>(4);
            let mut calls = 0;

            let res = panic::catch_unwind(AssertUnwindSafe(|| {
                super::merge_external(
                    &mut v,
                    Range::new(0, 4),
                    Range::new(4, 9),
                    &mut cache,
                    &mut |a: &String, b: &String| {
                        calls += 1;
                        if calls > limit {
                            panic!("comparison limit reached");
                        }
                        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
                    },
                );
            }));

            assert!(res.is_err());

            let mut got = v.clone();
            let mut expect = input.clone();
            got.sort();
            expect.sort();
            assert_eq!(got, expect, "after {} comparisons", limit);
        }
    }
}
