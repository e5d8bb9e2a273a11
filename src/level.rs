//! Splits `[0, size)` into the runs merged at each level of the bottom-up sort.
//!
//! The bottom-up merge only ever works on a power-of-two number of runs. For a `size` that is not
//! itself a power of two, the run boundaries are scaled by the fraction
//! `size / floor_power_of_two(size)` using integer fixed-point arithmetic, so the runs of a level
//! differ in length by at most one and always add up to exactly `size`.

use crate::Range;
use contracts::*;

#[derive(Clone, Debug)]
pub struct LevelIter {
    size: usize,
    denominator: usize,
    numerator_step: usize,
    decimal_step: usize,
    numerator: usize,
    decimal: usize,
}

impl LevelIter {
    /// Creates an iterator whose first level has runs of `min_level` to `2 * min_level - 1`
    /// elements.
    #[debug_requires(min_level > 0)]
    #[debug_requires(size >= min_level)]
    pub fn new(size: usize, min_level: usize) -> Self {
        let denominator = floor_power_of_two(size) / min_level;

        LevelIter {
            size,
            denominator,
            numerator_step: size % denominator,
            decimal_step: size / denominator,
            numerator: 0,
            decimal: 0,
        }
    }

    /// Rewinds to the first run of the current level.
    pub fn begin(&mut self) {
        self.numerator = 0;
        self.decimal = 0;
    }

    #[debug_requires(!self.finished())]
    pub fn next_range(&mut self) -> Range {
        let start = self.decimal;

        self.decimal += self.decimal_step;
        self.numerator += self.numerator_step;
        if self.numerator >= self.denominator {
            self.numerator -= self.denominator;
            self.decimal += 1;
        }

        Range::new(start, self.decimal)
    }

    pub fn finished(&self) -> bool {
        self.decimal >= self.size
    }

    /// Doubles the run length. Returns `false` once a single run would cover the whole input.
    pub fn next_level(&mut self) -> bool {
        self.decimal_step += self.decimal_step;
        self.numerator_step += self.numerator_step;
        if self.numerator_step >= self.denominator {
            self.numerator_step -= self.denominator;
            self.decimal_step += 1;
        }

        self.decimal_step < self.size
    }

    /// The length of the shorter runs at this level. Longer runs have one more element.
    pub fn length(&self) -> usize {
        self.decimal_step
    }
}

/// 63 -> 32, 64 -> 64, etc.
#[debug_requires(x > 0)]
#[debug_ensures(ret.is_power_of_two() && ret <= x && x / 2 < ret)]
pub fn floor_power_of_two(x: usize) -> usize {
    1 << (usize::BITS - 1 - x.leading_zeros())
}
