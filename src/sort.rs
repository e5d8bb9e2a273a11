//! A block merge sort.
//!
//! Runs of 4 to 8 elements are sorted with sorting networks, then merged bottom-up, doubling in
//! length each level. Levels that fit in the cache are merged through it. Larger levels pull out
//! internal buffers of distinct values and merge blocks in place with their help.

use alloc::boxed::Box;
use std::cmp::Ordering;
use std::fmt;
use std::iter;
use std::mem::{self, MaybeUninit};

use crate::block::roll::BlockMerge;
use crate::block::rotate;
use crate::extract_buf::{block_size_for, InternalBuffers};
use crate::level::LevelIter;
use crate::merge_cache::{merge_external, merge_pairs_via_cache};
use crate::network::{self, MAX_NETWORK_LEN, MIN_NETWORK_LEN};
use crate::quadratic_sort::insertion_sort;
use crate::{Either, Range};

/// The number of elements a [`WikiSorter`] can hold in its cache unless told otherwise.
pub const DEFAULT_CACHE_SIZE: usize = 512;

/// Sorts `s`, preserving the order of equal elements.
pub fn sort<T: Ord>(s: &mut [T]) {
    sort_by(s, Ord::cmp)
}

/// Sorts `s` with a comparator, preserving the order of elements that compare equal.
///
/// Uses a temporary cache of at most [`DEFAULT_CACHE_SIZE`] elements.
pub fn sort_by<T>(s: &mut [T], cmp: impl FnMut(&T, &T) -> Ordering) {
    WikiSorter::with_cache_size(DEFAULT_CACHE_SIZE.min(s.len())).sort_by(s, cmp)
}

/// Sorts `s` by the key `f` extracts from each element, preserving the order of elements with
/// equal keys.
pub fn sort_by_key<T, K: Ord>(s: &mut [T], mut f: impl FnMut(&T) -> K) {
    sort_by(s, |a, b| f(a).cmp(&f(b)))
}

/// A stable sort that reuses its cache across calls.
///
/// The cache is allocated once, when the sorter is created. Any size works, including zero. Larger
/// caches let more of the merges run at full speed. Beyond about half the input length there is
/// nothing left to gain.
///
/// ```
/// use wiki_sort::WikiSorter;
///
/// let mut sorter = WikiSorter::with_cache_size(16);
///
/// let mut v = [4, 1, 3, 1, 5, 9, 2, 6];
/// sorter.sort(&mut v);
/// assert_eq!(v, [1, 1, 2, 3, 4, 5, 6, 9]);
///
/// let mut pairs = [(2, 'a'), (1, 'b'), (2, 'c'), (0, 'd')];
/// let mut pair_sorter = WikiSorter::with_cache_size(0);
/// pair_sorter.sort_by_key(&mut pairs, |&(k, _)| k);
/// assert_eq!(pairs, [(0, 'd'), (1, 'b'), (2, 'a'), (2, 'c')]);
/// ```
pub struct WikiSorter<T> {
    cache: Box<[MaybeUninit<T>]>,
}

impl<T> WikiSorter<T> {
    /// Creates a sorter with a cache of [`DEFAULT_CACHE_SIZE`] elements.
    pub fn new() -> Self {
        Self::with_cache_size(DEFAULT_CACHE_SIZE)
    }

    pub fn with_cache_size(cache_size: usize) -> Self {
        WikiSorter {
            cache: iter::repeat_with(MaybeUninit::uninit)
                .take(cache_size)
                .collect(),
        }
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    pub fn sort(&mut self, s: &mut [T])
    where
        T: Ord,
    {
        self.sort_by(s, Ord::cmp)
    }

    pub fn sort_by(&mut self, s: &mut [T], mut cmp: impl FnMut(&T, &T) -> Ordering) {
        wiki_sort(s, &mut self.cache, &mut cmp);
    }

    pub fn sort_by_key<K: Ord>(&mut self, s: &mut [T], mut f: impl FnMut(&T) -> K) {
        self.sort_by(s, |a, b| f(a).cmp(&f(b)))
    }
}

impl<T> Default for WikiSorter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for WikiSorter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WikiSorter")
            .field("cache_size", &self.cache_size())
            .finish()
    }
}

fn wiki_sort<T>(
    s: &mut [T],
    cache: &mut [MaybeUninit<T>],
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) {
    // Values of a zero-sized type are indistinguishable, so every order is sorted.
    if mem::size_of::<T>() == 0 {
        return;
    }

    let size = s.len();
    if size < MIN_NETWORK_LEN {
        network::sort_tiny(s, cmp);
        return;
    }

    let mut it = LevelIter::new(size, MIN_NETWORK_LEN);
    while !it.finished() {
        let range = it.next_range();
        network::sort_network(&mut s[range.as_range()], cmp);
    }

    if size < MAX_NETWORK_LEN {
        return;
    }

    loop {
        // `<` rather than `<=`, since some runs are one longer than `it.length()`.
        if it.length() < cache.len() {
            if (it.length() + 1) * 4 <= cache.len() && it.length() * 4 <= size {
                merge_level_pairs_via_cache(s, &mut it, cache, cmp);

                // That was two levels at once.
                it.next_level();
            } else {
                merge_level_via_cache(s, &mut it, cache, cmp);
            }
        } else {
            merge_level_in_place(s, &mut it, cache, cmp);
        }

        if !it.next_level() {
            break;
        }
    }
}

fn merge_level_pairs_via_cache<T>(
    s: &mut [T],
    it: &mut LevelIter,
    cache: &mut [MaybeUninit<T>],
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) {
    it.begin();
    while !it.finished() {
        let a1 = it.next_range();
        let b1 = it.next_range();
        let a2 = it.next_range();
        let b2 = it.next_range();

        merge_pairs_via_cache(s, a1, b1, a2, b2, cache, cmp);
    }
}

fn merge_level_via_cache<T>(
    s: &mut [T],
    it: &mut LevelIter,
    cache: &mut [MaybeUninit<T>],
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) {
    it.begin();
    while !it.finished() {
        let a = it.next_range();
        let b = it.next_range();

        if cmp(&s[b.end - 1], &s[a.start]).is_lt() {
            rotate(s, Either::Left(a.len()), Range::new(a.start, b.end));
        } else if cmp(&s[b.start], &s[a.end - 1]).is_lt() {
            merge_external(s, a, b, cache, cmp);
        }
    }
}

fn merge_level_in_place<T>(
    s: &mut [T],
    it: &mut LevelIter,
    cache: &mut [MaybeUninit<T>],
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) {
    let mut buffers = InternalBuffers::find(s, it, cache.len(), cmp);
    buffers.pull_out(s, cmp);

    let mut merge = BlockMerge {
        block_size: block_size_for(it.length(), buffers.buffer1.len()),
        buffer1: buffers.buffer1,
        buffer2: buffers.buffer2,
        cache,
    };

    it.begin();
    while !it.finished() {
        let (a, b) = match buffers.trim(it.next_range(), it.next_range()) {
            Some(pair) => pair,
            None => continue,
        };

        if cmp(&s[b.end - 1], &s[a.start]).is_lt() {
            rotate(s, Either::Left(a.len()), Range::new(a.start, b.end));
        } else if cmp(&s[a.end], &s[a.end - 1]).is_lt() {
            merge.merge(s, a, b, cmp);
        }
    }

    // Merging left `buffer2` shuffled.
    insertion_sort(s, buffers.buffer2, cmp);
    buffers.redistribute(s, cmp);
}
