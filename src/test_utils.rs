use proptest::prelude::*;
use std::cmp::Ordering;
use std::fmt;

#[cfg(test)]
macro_rules! prop_unwrap {
    ($e:expr) => {
        match $e {
            Err(::proptest::prelude::TestCaseError::Reject(s)) => {
                panic!("Helper function rejected input: {}", s)
            }
            Err(::proptest::prelude::TestCaseError::Fail(s)) => panic!("{}", s),
            Ok(x) => x,
        }
    };
}

pub fn is_sorted_by<T>(s: &[T], cmp: &mut impl FnMut(&T, &T) -> Ordering) -> bool {
    s.windows(2).all(|pair| cmp(&pair[0], &pair[1]).is_le())
}

pub fn is_sorted<T: Ord>(s: &[T]) -> bool {
    is_sorted_by(s, &mut Ord::cmp)
}

/// A vector whose elements before and after `mid` are each sorted.
#[derive(Clone, Debug)]
pub struct SortedPair<T> {
    pub seq: Vec<T>,
    pub mid: usize,
}

impl<T> SortedPair<T> {
    pub fn new(seq: Vec<T>, mid: usize) -> Self {
        assert!(mid <= seq.len());
        SortedPair { seq, mid }
    }

    pub fn map_seq<R>(self, f: impl FnOnce(Vec<T>) -> Vec<R>) -> SortedPair<R> {
        SortedPair {
            seq: f(self.seq),
            mid: self.mid,
        }
    }

    pub fn split(&self) -> (&[T], &[T]) {
        self.seq.split_at(self.mid)
    }
}

pub fn sorted_pair<S>(
    len: impl Into<proptest::collection::SizeRange>,
    values: S,
) -> impl Strategy<Value = SortedPair<S::Value>>
where
    S: Strategy,
    S::Value: Clone + Ord,
{
    proptest::collection::vec(values, len)
        .prop_flat_map(|v| {
            let len = v.len();
            (Just(v), 0..=len)
        })
        .prop_map(|(mut seq, mid)| {
            let (a, b) = seq.split_at_mut(mid);
            a.sort_unstable();
            b.sort_unstable();
            SortedPair { seq, mid }
        })
}

/// Like [`sorted_pair`], but both halves have at least one element.
pub fn sorted_pair_nonempty<S>(
    len: std::ops::Range<usize>,
    values: S,
) -> impl Strategy<Value = SortedPair<S::Value>>
where
    S: Strategy,
    S::Value: Clone + Ord,
{
    assert!(len.start >= 2);

    sorted_pair(len, values).prop_map(|mut pair| {
        let len = pair.seq.len();
        if pair.mid == 0 || pair.mid == len {
            pair.mid = len / 2;
            let (a, b) = pair.seq.split_at_mut(pair.mid);
            a.sort_unstable();
            b.sort_unstable();
        }

        pair
    })
}

/// An element coupled with its index in some container.
///
/// Used to test the stability of sorting algorithms.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct KeyAndIndex<T> {
    pub key: T,
    pub idx: u32, // `u32` cuts the amount of memory required in half on 64-bit systems.
}

impl<T: fmt::Debug> fmt::Debug for KeyAndIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn to_string_subscript(mut i: usize) -> String {
            if i == 0 {
                return "₀".to_owned();
            }

            let mut ret = Vec::new();
            while i != 0 {
                let digit = i % 10;
                ret.push(char::from_u32('₀' as u32 + digit as u32).unwrap());
                i /= 10;
            }

            ret.into_iter().rev().collect()
        }

        let sub = to_string_subscript(self.idx as usize);
        write!(f, "{:?}{}", self.key, sub)
    }
}

impl<T> KeyAndIndex<T> {
    pub fn new(key: T, idx: usize) -> Self {
        let idx = idx.try_into().expect("Index overflowed a u32");
        KeyAndIndex { key, idx }
    }

    pub fn map_vec(v: Vec<T>) -> Vec<KeyAndIndex<T>> {
        v.into_iter()
            .enumerate()
            .map(|(idx, key)| KeyAndIndex::new(key, idx))
            .collect()
    }
}

pub fn cmp_ignore_idx<T: Ord>(a: &KeyAndIndex<T>, b: &KeyAndIndex<T>) -> Ordering {
    a.key.cmp(&b.key)
}

/// A stable merge of `l` and `r`, preferring elements of `l` on ties.
pub fn merge_by_naive<T: Clone>(
    l: &[T],
    r: &[T],
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) -> Vec<T> {
    let mut ret = Vec::with_capacity(l.len() + r.len());

    let mut i = 0;
    let mut j = 0;

    while i < l.len() && j < r.len() {
        if cmp(&r[j], &l[i]).is_lt() {
            ret.push(r[j].clone());
            j += 1;
        } else {
            ret.push(l[i].clone());
            i += 1;
        }
    }

    ret.extend_from_slice(&l[i..]);
    ret.extend_from_slice(&r[j..]);
    ret
}
