//! Merge two contiguous sequences **without** using an internal buffer.

use crate::block::rotate;
use crate::search::{binary_first, binary_last};
use crate::{Either, Range};
use contracts::*;
use std::cmp::Ordering;

/// Merges two sorted runs that are contiguous in memory without using additional storage.
///
/// # Runtime
///
/// Each round does a binary search into B and a rotation. This is quadratic in general, but it is
/// only used when a level of the sort could not find enough distinct values for an internal
/// buffer. That bounds the number of distinct values in each run, and with it the number of
/// rounds.
///
/// # Algorithm
///
/// Find where the first element of A belongs in B, and rotate A past every element of B that is
/// strictly smaller. That prefix of B is now in its final place, as are all elements of A equal to
/// the first one. Skip them with a binary search and repeat on what is left.
///
/// ```text
///     A         B                         A        B
/// [4 4 7 9][1 2 3 6 8]  -> rotate ->  1 2 3 [4 4 7 9][6 8]  -> skip 4s ->  [7 9][6 8]
///           |-----|
///            mid - a.end = 3
/// ```
#[debug_requires(a.end == b.start && b.end <= s.len())]
pub fn merge_in_place<T>(
    s: &mut [T],
    mut a: Range,
    mut b: Range,
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) {
    if a.is_empty() || b.is_empty() {
        return;
    }

    loop {
        let mid = binary_first(s, &s[a.start], b, cmp);

        let amount = mid - a.end;
        rotate(s, Either::Right(amount), Range::new(a.start, mid));
        if b.end == mid {
            break;
        }

        b.start = mid;
        a.set(a.start + amount, b.start);
        // `s[a.start]` is never greater than itself, unless the comparator is inconsistent.
        a.start = binary_last(s, &s[a.start], a, cmp).max(a.start + 1);
        if a.is_empty() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{self, cmp_ignore_idx, sorted_pair, KeyAndIndex, SortedPair};
    use crate::Range;
    use proptest::prelude::*;
    use std::fmt::Debug;

    fn test_merge<T: Clone + Debug + Ord>(input: SortedPair<T>) -> Result<(), TestCaseError> {
        let cmp = &mut cmp_ignore_idx;
        let input = input.map_seq(KeyAndIndex::map_vec);

        let (l, r) = input.split();
        let expected = test_utils::merge_by_naive(l, r, cmp);

        let mut actual = input.seq.clone();
        let len = actual.len();
        super::merge_in_place(
            &mut actual,
            Range::new(0, input.mid),
            Range::new(input.mid, len),
            cmp,
        );

        prop_assert_eq!(actual, expected);
        Ok(())
    }

    #[test]
    fn merge_oneshot() {
        prop_unwrap!(test_merge(SortedPair::new(
            vec![1, 4, 4, 4, 9, 1, 3, 4, 7, 7],
            5
        )));
    }

    proptest! {
        #[test]
        fn merge(input in sorted_pair(0..100, 0u8..10)) {
            test_merge(input)?;
        }

        #[test]
        fn merge_few_distinct(input in sorted_pair(0..300, 0u8..3)) {
            test_merge(input)?;
        }
    }
}
