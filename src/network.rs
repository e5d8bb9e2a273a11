//! Base case of the sort: fixed compare-exchange networks for runs of 4 to 8 elements, and direct
//! comparisons for inputs shorter than 4.
//!
//! Sorting networks are not stable on their own. Each exchange also tracks the original position
//! of the elements it moves, and equal elements are exchanged whenever they are out of their
//! original order, which makes the result stable.

use static_assertions::const_assert;
use std::cmp::Ordering;

type Network = &'static [(usize, usize)];

// http://pages.ripco.net/~jgamble/nw.html
const NETWORK_4: Network = &[(0, 1), (2, 3), (0, 2), (1, 3), (1, 2)];

#[rustfmt::skip]
const NETWORK_5: Network = &[
    (0, 1), (3, 4),
    (2, 4),
    (2, 3), (1, 4),
    (0, 3),
    (0, 2), (1, 3),
    (1, 2),
];

#[rustfmt::skip]
const NETWORK_6: Network = &[
    (1, 2), (4, 5),
    (0, 2), (3, 5),
    (0, 1), (3, 4), (2, 5),
    (0, 3), (1, 4),
    (2, 4), (1, 3),
    (2, 3),
];

#[rustfmt::skip]
const NETWORK_7: Network = &[
    (1, 2), (3, 4), (5, 6),
    (0, 2), (3, 5), (4, 6),
    (0, 1), (4, 5), (2, 6),
    (0, 4), (1, 5),
    (0, 3), (2, 5),
    (1, 3), (2, 4),
    (2, 3),
];

#[rustfmt::skip]
const NETWORK_8: Network = &[
    (0, 1), (2, 3), (4, 5), (6, 7),
    (0, 2), (1, 3), (4, 6), (5, 7),
    (1, 2), (5, 6), (0, 4), (3, 7),
    (1, 5), (2, 6),
    (1, 4), (3, 6),
    (2, 4), (3, 5),
    (3, 4),
];

const fn is_network_for(net: Network, len: usize) -> bool {
    let mut i = 0;
    while i < net.len() {
        let (x, y) = net[i];
        if x >= y || y >= len {
            return false;
        }
        i += 1;
    }

    true
}

const_assert!(is_network_for(NETWORK_4, 4));
const_assert!(is_network_for(NETWORK_5, 5));
const_assert!(is_network_for(NETWORK_6, 6));
const_assert!(is_network_for(NETWORK_7, 7));
const_assert!(is_network_for(NETWORK_8, 8));

pub const MIN_NETWORK_LEN: usize = 4;
pub const MAX_NETWORK_LEN: usize = 8;

const_assert!(MAX_NETWORK_LEN == 2 * MIN_NETWORK_LEN);

/// Sorts a slice of 4 to 8 elements with the network for its length.
pub fn sort_network<T>(s: &mut [T], cmp: &mut impl FnMut(&T, &T) -> Ordering) {
    let net = match s.len() {
        4 => NETWORK_4,
        5 => NETWORK_5,
        6 => NETWORK_6,
        7 => NETWORK_7,
        8 => NETWORK_8,
        len => unreachable!("no sorting network for {} elements", len),
    };

    let mut order: [u8; MAX_NETWORK_LEN] = [0, 1, 2, 3, 4, 5, 6, 7];
    for &(x, y) in net {
        net_swap(s, &mut order, x, y, cmp);
    }
}

fn net_swap<T>(
    s: &mut [T],
    order: &mut [u8; MAX_NETWORK_LEN],
    x: usize,
    y: usize,
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
) {
    let ord = cmp(&s[x], &s[y]);
    if ord.is_gt() || (ord.is_eq() && order[x] > order[y]) {
        s.swap(x, y);
        order.swap(x, y);
    }
}

/// Sorts slices with fewer than 4 elements.
pub fn sort_tiny<T>(s: &mut [T], cmp: &mut impl FnMut(&T, &T) -> Ordering) {
    match s.len() {
        0 | 1 => {}
        2 => {
            if cmp(&s[1], &s[0]).is_lt() {
                s.swap(0, 1);
            }
        }
        3 => {
            if cmp(&s[1], &s[0]).is_lt() {
                s.swap(0, 1);
            }
            if cmp(&s[2], &s[1]).is_lt() {
                s.swap(1, 2);
                if cmp(&s[1], &s[0]).is_lt() {
                    s.swap(0, 1);
                }
            }
        }
        len => unreachable!("{} elements is not tiny", len),
    }
}
