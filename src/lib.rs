//! A stable, in-place block merge sort (WikiSort).
//!
//! Sorting runs bottom-up: fixed sorting networks produce runs of 4 to 8 elements, then each level
//! merges adjacent runs pairwise. Levels whose runs fit in a small fixed-size cache are merged
//! through it; larger levels pull `√n` distinct values out of the slice itself and use them as
//! scratch space, falling back to rotation-based merges when there are too few distinct values.
//!
//! ```
//! let mut v = [5, 3, 3, 1, 4, 2, 3];
//! wiki_sort::sort(&mut v);
//! assert_eq!(v, [1, 2, 3, 3, 3, 4, 5]);
//!
//! // A sorter owns its cache and can be reused across calls.
//! let mut sorter = wiki_sort::WikiSorter::with_cache_size(0);
//! let mut pairs = [(3, 'a'), (1, 'b'), (3, 'c')];
//! sorter.sort_by(&mut pairs, |a, b| a.0.cmp(&b.0));
//! assert_eq!(pairs, [(1, 'b'), (3, 'a'), (3, 'c')]);
//! ```

#![cfg_attr(not(test), no_std)]

#[cfg(not(test))]
extern crate core as std;

extern crate alloc;

#[cfg(test)]
#[macro_use]
mod test_utils;

mod block;
mod extract_buf;
mod level;
mod merge_buf;
mod merge_cache;
mod merge_no_buf;
mod network;
mod quadratic_sort;
mod range;
mod search;
mod sort;

pub use sort::{sort, sort_by, sort_by_key, WikiSorter, DEFAULT_CACHE_SIZE};
use range::Range;

type Either<T = ()> = either::Either<T, T>;
