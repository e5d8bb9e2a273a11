//! Internal buffers: runs of distinct values pulled out of the array for the duration of a level.
//!
//! A level that is too large for the cache needs up to two buffers of about `√len` distinct values
//! each. The first tags A blocks so their order can be recovered after rolling. The second holds
//! the A block being merged. Both are found by scanning the runs of the level, moved to the edge
//! of the run they were found in, and merged back into that run once the level is done.

use std::cmp::Ordering;

use contracts::*;

use crate::block::rotate;
use crate::level::LevelIter;
use crate::range::Pull;
use crate::search::{find_first_backward, find_first_forward, find_last_backward, find_last_forward};
use crate::{Either, Range};

/// Where this level's buffers live, and how to put them back.
#[derive(Clone, Debug, Default)]
pub struct InternalBuffers {
    pub buffer1: Range,
    pub buffer2: Range,
    pulls: [Pull; 2],
}

impl InternalBuffers {
    /// Scans every `(A, B)` pair of the current level for runs of distinct values.
    ///
    /// Nothing is moved yet. Prefers a single run of `2 * buffer_size` distinct values, then two
    /// runs of `buffer_size` each, and otherwise settles for the largest run it saw as `buffer1`
    /// with an empty `buffer2`. If every A block fits in the cache, only `buffer1` is needed.
    pub fn find<T>(
        s: &[T],
        it: &mut LevelIter,
        cache_len: usize,
        cmp: &mut impl FnMut(&T, &T) -> Ordering,
    ) -> Self {
        let level_len = it.length();
        let block_size = isqrt(level_len);
        let buffer_size = level_len / block_size + 1;

        let mut ret = InternalBuffers::default();
        let mut pull_index = 0;

        let mut find = buffer_size + buffer_size;
        let mut find_separately = false;

        if block_size <= cache_len {
            find = buffer_size;
        } else if find > level_len {
            // Both buffers won't fit in the same subarray.
            find = buffer_size;
            find_separately = true;
        }

        it.begin();
        while !it.finished() {
            let a = it.next_range();
            let b = it.next_range();

            // Distinct values in A are pulled to its start.
            let (mut last, mut count) = (a.start, 1);
            while count < find {
                let index =
                    find_last_forward(s, &s[last], Range::new(last + 1, a.end), find - count, cmp);
                if index == a.end {
                    break;
                }
                last = index;
                count += 1;
            }

            if count >= buffer_size {
                ret.pulls[pull_index] = Pull {
                    range: Range::new(a.start, b.end),
                    count,
                    from: last,
                    to: a.start,
                };
                pull_index = 1;

                if count == buffer_size + buffer_size {
                    ret.buffer1 = Range::new(a.start, a.start + buffer_size);
                    ret.buffer2 = Range::new(a.start + buffer_size, a.start + count);
                    break;
                } else if find == buffer_size + buffer_size {
                    ret.buffer1 = Range::new(a.start, a.start + count);
                    find = buffer_size;
                } else if block_size <= cache_len {
                    ret.buffer1 = Range::new(a.start, a.start + count);
                    break;
                } else if find_separately {
                    ret.buffer1 = Range::new(a.start, a.start + count);
                    find_separately = false;
                } else {
                    ret.buffer2 = Range::new(a.start, a.start + count);
                    break;
                }
            } else if pull_index == 0 && count > ret.buffer1.len() {
                ret.buffer1 = Range::new(a.start, a.start + count);
                ret.pulls[0] = Pull {
                    range: Range::new(a.start, b.end),
                    count,
                    from: last,
                    to: a.start,
                };
            }

            // Distinct values in B are pulled to its end.
            let (mut last, mut count) = (b.end - 1, 1);
            while count < find {
                let index =
                    find_first_backward(s, &s[last], Range::new(b.start, last), find - count, cmp);
                if index == b.start {
                    break;
                }
                last = index - 1;
                count += 1;
            }

            if count >= buffer_size {
                ret.pulls[pull_index] = Pull {
                    range: Range::new(a.start, b.end),
                    count,
                    from: last,
                    to: b.end,
                };
                pull_index = 1;

                if count == buffer_size + buffer_size {
                    ret.buffer1 = Range::new(b.end - count, b.end - buffer_size);
                    ret.buffer2 = Range::new(b.end - buffer_size, b.end);
                    break;
                } else if find == buffer_size + buffer_size {
                    ret.buffer1 = Range::new(b.end - count, b.end);
                    find = buffer_size;
                } else if block_size <= cache_len {
                    ret.buffer1 = Range::new(b.end - count, b.end);
                    break;
                } else if find_separately {
                    ret.buffer1 = Range::new(b.end - count, b.end);
                    find_separately = false;
                } else {
                    // buffer1 was pulled to the start of this same A. Redistributing it must stop
                    // short of buffer2.
                    if ret.pulls[0].range.start == a.start {
                        ret.pulls[0].range.end -= ret.pulls[1].count;
                    }

                    ret.buffer2 = Range::new(b.end - count, b.end);
                    break;
                }
            } else if pull_index == 0 && count > ret.buffer1.len() {
                ret.buffer1 = Range::new(b.end - count, b.end);
                ret.pulls[0] = Pull {
                    range: Range::new(a.start, b.end),
                    count,
                    from: last,
                    to: b.end,
                };
            }
        }

        ret
    }

    /// Moves the distinct values found by [`find`](Self::find) into `buffer1` and `buffer2`.
    ///
    /// Pulling left keeps the first occurrence of each value. Pulling right keeps the last. The
    /// order of the remaining elements is unchanged.
    pub fn pull_out<T>(&mut self, s: &mut [T], cmp: &mut impl FnMut(&T, &T) -> Ordering) {
        for pull in &mut self.pulls {
            let length = pull.count;

            match pull.direction() {
                Some(Either::Left(())) => {
                    let mut index = pull.from;
                    for count in 1..length {
                        index = find_first_backward(
                            s,
                            &s[index - 1],
                            Range::new(pull.to, pull.from - (count - 1)),
                            length - count,
                            cmp,
                        )
                        // Only an inconsistent comparator can land outside these bounds. They
                        // leave room for the values still to be pulled.
                        .max(pull.to + (length - 1 - count))
                        .min(pull.from - count);
                        let range = Range::new(index + 1, pull.from + 1);
                        rotate(s, Either::Left(range.len() - count), range);
                        pull.from = index + count;
                    }
                }

                Some(Either::Right(())) => {
                    let mut index = pull.from + 1;
                    for count in 1..length {
                        index = find_last_forward(
                            s,
                            &s[index],
                            Range::new(index, pull.to),
                            length - count,
                            cmp,
                        )
                        .max(pull.from + count + 1)
                        .min(pull.to + count + 1 - length);
                        let range = Range::new(pull.from, index - 1);
                        rotate(s, Either::Left(count), range);
                        pull.from = index - 1 - count;
                    }
                }

                None => {}
            }
        }
    }

    /// Shrinks a pair of runs so it excludes any buffer pulled out of it.
    ///
    /// Returns `None` if a buffer takes up all of A or all of B, in which case there is nothing
    /// to merge.
    pub fn trim(&self, mut a: Range, mut b: Range) -> Option<(Range, Range)> {
        let start = a.start;

        for pull in &self.pulls {
            if start != pull.range.start {
                continue;
            }

            match pull.direction() {
                Some(Either::Left(())) => {
                    a.start += pull.count;
                    if a.is_empty() {
                        return None;
                    }
                }

                Some(Either::Right(())) => {
                    b.end -= pull.count;
                    if b.is_empty() {
                        return None;
                    }
                }

                None => {}
            }
        }

        Some((a, b))
    }

    /// Merges each buffer back into the run it was pulled from.
    ///
    /// Both buffers must be sorted, and the runs they came from must have been merged.
    pub fn redistribute<T>(&self, s: &mut [T], cmp: &mut impl FnMut(&T, &T) -> Ordering) {
        for pull in &self.pulls {
            let mut unique = pull.count * 2;

            match pull.direction() {
                Some(Either::Left(())) => {
                    let mut buffer = Range::new(pull.range.start, pull.range.start + pull.count);
                    while !buffer.is_empty() {
                        let index = find_first_forward(
                            s,
                            &s[buffer.start],
                            Range::new(buffer.end, pull.range.end),
                            unique,
                            cmp,
                        );
                        let amount = index - buffer.end;
                        rotate(s, Either::Left(buffer.len()), Range::new(buffer.start, index));
                        buffer.start += amount + 1;
                        buffer.end += amount;
                        unique -= 2;
                    }
                }

                Some(Either::Right(())) => {
                    let mut buffer = Range::new(pull.range.end - pull.count, pull.range.end);
                    while !buffer.is_empty() {
                        let index = find_last_backward(
                            s,
                            &s[buffer.end - 1],
                            Range::new(pull.range.start, buffer.start),
                            unique,
                            cmp,
                        );
                        let amount = buffer.start - index;
                        rotate(s, Either::Left(amount), Range::new(index, buffer.end));
                        buffer.start -= amount;
                        buffer.end -= amount + 1;
                        unique -= 2;
                    }
                }

                None => {}
            }
        }
    }
}

/// The size of the A blocks that can be tagged with a buffer of `buffer_size` values.
///
/// Every full A block of a level needs its own tag, so this must hold even for the longest runs.
#[debug_requires(buffer_size > 0)]
#[ensures((level_len + 1) / ret <= buffer_size, "buffer1 is too small to tag every A block")]
pub fn block_size_for(level_len: usize, buffer_size: usize) -> usize {
    level_len / buffer_size + 1
}

/// `⌊√n⌋`, by Newton's method.
#[debug_ensures(ret * ret <= n && (ret + 1).checked_mul(ret + 1).map_or(true, |sq| n < sq))]
fn isqrt(n: usize) -> usize {
    if n < 2 {
        return n;
    }

    let mut x = n;
    let mut y = n / 2 + (n & 1);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }

    x
}
