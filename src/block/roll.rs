//! Tagging A blocks and rolling them through B blocks.
//!
//! A is split into an uneven first block followed by blocks of exactly `block_size` elements. The
//! first element of each full block is swapped with the next value of the first internal buffer.
//! Those values are distinct and sorted, so they remember the original order of the blocks even
//! after blocks with equal contents have been shuffled around. The A blocks are then rolled
//! through B one block at a time. Whenever the smallest remaining A block belongs before the next
//! B block, it is dropped into place and the previous A block is merged with the B values that
//! follow it.

use std::cmp::Ordering;
use std::mem::MaybeUninit;

use contracts::*;

use super::{block_swap, rotate};
use crate::merge_buf::merge_internal;
use crate::merge_cache::merge_external;
use crate::merge_no_buf::merge_in_place;
use crate::search::binary_first;
use crate::{Either, Range};

#[cfg(test)]
use crate::test_utils::is_sorted_by;

/// The scratch space shared by every block merge in a level.
pub struct BlockMerge<'c, T> {
    pub block_size: usize,

    /// Sorted, distinct values used to tag A blocks. One is needed per full A block.
    pub buffer1: Range,

    /// Holds the A block being merged when it does not fit in the cache. May be empty.
    pub buffer2: Range,

    pub cache: &'c mut [MaybeUninit<T>],
}

impl<'c, T> BlockMerge<'c, T> {
    /// Merges the adjacent sorted runs `s[a]` and `s[b]`.
    ///
    /// Afterwards `buffer1` holds its original contents in their original order. `buffer2` holds
    /// its original contents in an unspecified order.
    #[debug_requires(self.block_size > 0)]
    #[debug_requires(a.end == b.start && b.end <= s.len() && !b.is_empty())]
    #[debug_requires(a.len() / self.block_size <= self.buffer1.len())]
    #[debug_requires(self.buffer2.is_empty() || self.buffer2.len() >= self.block_size)]
    #[test_requires(is_sorted_by(&s[a.as_range()], cmp) && is_sorted_by(&s[b.as_range()], cmp))]
    #[test_requires(s[self.buffer1.as_range()].windows(2).all(|w| cmp(&w[0], &w[1]).is_lt()))]
    pub fn merge(
        &mut self,
        s: &mut [T],
        a: Range,
        b: Range,
        cmp: &mut impl FnMut(&T, &T) -> Ordering,
    ) {
        let block_size = self.block_size;

        let mut block_a = a;
        let first_a = Range::new(a.start, a.start + a.len() % block_size);

        let mut index_a = self.buffer1.start;
        for index in (first_a.end..block_a.end).step_by(block_size) {
            s.swap(index_a, index);
            index_a += 1;
        }

        let mut last_a = first_a;
        let mut last_b = Range::default();
        let mut block_b = Range::new(b.start, b.start + block_size.min(b.len()));
        block_a.start += first_a.len();
        index_a = self.buffer1.start;

        // A block that is merged through `buffer2` has to be stored there first.
        if last_a.len() > self.cache.len() && !self.buffer2.is_empty() {
            block_swap(s, last_a.start, self.buffer2.start, last_a.len());
        }

        while !block_a.is_empty() {
            let drop_min_a = block_b.is_empty()
                || (!last_b.is_empty() && cmp(&s[last_b.end - 1], &s[index_a]).is_ge());

            if drop_min_a {
                let b_split = binary_first(s, &s[index_a], last_b, cmp);
                let b_remaining = last_b.end - b_split;

                // The A block with the smallest tag is the next one in the original order.
                let mut min_a = block_a.start;
                for find_a in (min_a + block_size..block_a.end).step_by(block_size) {
                    if cmp(&s[find_a], &s[min_a]).is_lt() {
                        min_a = find_a;
                    }
                }
                block_swap(s, block_a.start, min_a, block_size);

                // Untag it.
                s.swap(block_a.start, index_a);
                index_a += 1;

                self.merge_last_a(s, last_a, Range::new(last_a.end, b_split), cmp);

                if block_size > self.cache.len() && !self.buffer2.is_empty() {
                    // The A block is now in `buffer2`, so the elements left behind in its place
                    // can be overwritten instead of rotated.
                    block_swap(s, block_a.start, self.buffer2.start, block_size);
                    block_swap(s, b_split, block_a.start + block_size - b_remaining, b_remaining);
                } else {
                    rotate(
                        s,
                        Either::Left(block_a.start - b_split),
                        Range::new(b_split, block_a.start + block_size),
                    );
                }

                let last_a_start = block_a.start - b_remaining;
                last_a = Range::new(last_a_start, last_a_start + block_size);
                last_b = Range::new(last_a.end, last_a.end + b_remaining);

                block_a.start += block_size;
            } else if block_b.len() < block_size {
                // The last B block is short, so move it before the remaining A blocks.
                rotate(s, Either::Right(block_b.len()), Range::new(block_a.start, block_b.end));

                last_b = Range::new(block_a.start, block_a.start + block_b.len());
                block_a.start += block_b.len();
                block_a.end += block_b.len();
                block_b.end = block_b.start;
            } else {
                // Roll the leftmost A block to the end by swapping it with the next B block.
                block_swap(s, block_a.start, block_b.start, block_size);
                last_b = Range::new(block_a.start, block_a.start + block_size);

                block_a.start += block_size;
                block_a.end += block_size;
                block_b.start += block_size;
                block_b.end = (block_b.end + block_size).min(b.end);
            }
        }

        self.merge_last_a(s, last_a, Range::new(last_a.end, b.end), cmp);
    }

    /// Merges the most recently dropped A block with the B values that follow it, using the
    /// fastest strategy the scratch space allows.
    fn merge_last_a(
        &mut self,
        s: &mut [T],
        last_a: Range,
        b: Range,
        cmp: &mut impl FnMut(&T, &T) -> Ordering,
    ) {
        if last_a.len() <= self.cache.len() {
            merge_external(s, last_a, b, self.cache, cmp);
        } else if !self.buffer2.is_empty() {
            merge_internal(s, last_a, b, self.buffer2, cmp);
        } else {
            merge_in_place(s, last_a, b, cmp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{cmp_ignore_idx, merge_by_naive, sorted_pair_nonempty, KeyAndIndex};
    use proptest::prelude::*;

    type Elem = KeyAndIndex<u16>;

    /// Lays out `|--buffer1--|--buffer2--|---A---|---B---|` and merges A with B.
    fn test_roll(
        a: &[Elem],
        b: &[Elem],
        block_size: usize,
        with_buffer2: bool,
        cache_len: usize,
    ) -> Result<(), TestCaseError> {
        let buf1_len = a.len() / block_size + 1;
        let buf2_len = if with_buffer2 { block_size + 1 } else { 0 };

        // Buffer keys sort after every key of A and B.
        let buffer1: Vec<Elem> = (0..buf1_len)
            .map(|i| KeyAndIndex::new(1000 + i as u16, 0))
            .collect();
        let buffer2: Vec<Elem> = (0..buf2_len).map(|i| KeyAndIndex::new(5000, i)).collect();

        let mut v = buffer1.clone();
        v.extend_from_slice(&buffer2);
        v.extend_from_slice(a);
        v.extend_from_slice(b);

        let a_start = buf1_len + buf2_len;
        let a_range = Range::new(a_start, a_start + a.len());
        let b_range = Range::new(a_range.end, a_range.end + b.len());

        let mut cache: Vec<MaybeUninit<Elem>> =
            std::iter::repeat_with(MaybeUninit::uninit).take(cache_len).collect();
        let mut merger = BlockMerge {
            block_size,
            buffer1: Range::new(0, buf1_len),
            buffer2: Range::new(buf1_len, buf1_len + buf2_len),
            cache: &mut cache,
        };
        merger.merge(&mut v, a_range, b_range, &mut cmp_ignore_idx);

        let expected = merge_by_naive(a, b, &mut cmp_ignore_idx);
        prop_assert_eq!(&v[a_start..], expected.as_slice());
        prop_assert_eq!(&v[..buf1_len], buffer1.as_slice());

        let mut got2 = v[buf1_len..a_start].to_vec();
        got2.sort();
        prop_assert_eq!(got2, buffer2);
        Ok(())
    }

    proptest! {
        #[test]
        fn roll(
            pair in sorted_pair_nonempty(2..300, 0u16..20),
            block_size in 1usize..24,
            with_buffer2 in any::<bool>(),
            cache_len in prop_oneof![Just(0usize), 0usize..30],
        ) {
            let pair = pair.map_seq(KeyAndIndex::map_vec);
            let (a, b) = pair.split();
            test_roll(a, b, block_size, with_buffer2, cache_len)?;
        }
    }

    #[test]
    fn roll_oneshot() {
        let v = KeyAndIndex::map_vec(vec![0, 2, 2, 3, 5, 5, 5, 8, 9, 1, 2, 2, 4, 5, 6, 7, 7]);
        let (a, b) = v.split_at(9);

        for &with_buffer2 in &[false, true] {
            for &cache_len in &[0, 1, 3, 9] {
                prop_unwrap!(test_roll(a, b, 3, with_buffer2, cache_len));
            }
        }
    }
}
