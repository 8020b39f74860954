//! Banded bounded edit distance
//!
//! Shared driver for the Levenshtein and Damerau-Levenshtein metrics. Only the
//! columns of the prefix-distance matrix that can still lead to an answer
//! within the bound are recomputed:
//!
//! - `left` advances past leading cells that already exceed the bound; those
//!   columns can never come back under it.
//! - `right` starts at `min(width, bound)` and grows by one column per row
//!   while the right-most cell stays within the bound.
//! - When `left` meets `right` every reachable column is over the bound and
//!   the computation stops early.
//!
//! The longer sequence drives the rows and the shorter one spans the columns,
//! so the rolling buffers are `O(min(m, n))`.

use log::trace;
use serde::{Deserialize, Serialize};

use super::damerau::DamerauRows;
use super::levenshtein::LevenshteinRow;
use super::sequence::{code_points, longer_first};
use crate::error::{ConfigError, Result};

/// Largest edit distance a caller is interested in
///
/// A bounded query answers `None` as soon as the distance provably exceeds
/// the limit, which is also what keeps its cost proportional to the bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    /// Compute the exact distance
    #[default]
    Unbounded,
    /// Give up once the distance is known to be larger than this
    AtMost(usize),
}

impl Bound {
    /// Parse the integer form used by sentinel-based callers: `-1` is
    /// unbounded, non-negative values are limits, anything else is rejected.
    pub fn from_raw(raw: i64) -> Result<Self> {
        match raw {
            -1 => Ok(Self::Unbounded),
            r if r < 0 => Err(ConfigError::NegativeBound(r)),
            r => Ok(Self::AtMost(usize::try_from(r).unwrap_or(usize::MAX))),
        }
    }

    /// The numeric limit, if any
    #[must_use]
    pub fn limit(self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::AtMost(k) => Some(k),
        }
    }

    /// Integer form: `-1` for unbounded
    #[must_use]
    pub fn to_raw(self) -> i64 {
        match self {
            Self::Unbounded => -1,
            Self::AtMost(k) => i64::try_from(k).unwrap_or(i64::MAX),
        }
    }
}

impl From<usize> for Bound {
    fn from(limit: usize) -> Self {
        Self::AtMost(limit)
    }
}

impl From<Option<usize>> for Bound {
    fn from(limit: Option<usize>) -> Self {
        limit.map_or(Self::Unbounded, Self::AtMost)
    }
}

impl TryFrom<i64> for Bound {
    type Error = ConfigError;

    fn try_from(raw: i64) -> Result<Self> {
        Self::from_raw(raw)
    }
}

/// Which recurrence fills the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Metric {
    Levenshtein,
    Damerau,
}

/// Row state for one of the two recurrences, picked once per call
pub(crate) enum RowCalculator<'a> {
    Levenshtein(LevenshteinRow<'a>),
    Damerau(DamerauRows<'a>),
}

impl<'a> RowCalculator<'a> {
    fn new(metric: Metric, s1: &'a [char], s2: &'a [char]) -> Self {
        match metric {
            Metric::Levenshtein => Self::Levenshtein(LevenshteinRow::new(s1, s2)),
            Metric::Damerau => Self::Damerau(DamerauRows::new(s1, s2)),
        }
    }

    /// Seed a new row at column `left`
    #[inline]
    fn reset(&mut self, left: usize) {
        match self {
            Self::Levenshtein(row) => row.reset(left),
            Self::Damerau(rows) => rows.reset(left),
        }
    }

    /// Compute the cell for `s1[i]` against `s2[j]`, stored at column `j + 1`
    #[inline]
    fn cell(&mut self, i: usize, j: usize) -> usize {
        match self {
            Self::Levenshtein(row) => row.cell(i, j),
            Self::Damerau(rows) => rows.cell(i, j),
        }
    }

    /// Current value stored at column `j`
    #[inline]
    fn value(&self, j: usize) -> usize {
        match self {
            Self::Levenshtein(row) => row.value(j),
            Self::Damerau(rows) => rows.value(j),
        }
    }
}

/// Active column range `[left, right)` over the shorter sequence
#[derive(Debug)]
struct Band {
    limit: usize,
    width: usize,
    left: usize,
    right: usize,
}

impl Band {
    fn new(width: usize, limit: usize) -> Self {
        Self {
            limit,
            width,
            left: 0,
            right: width.min(limit),
        }
    }

    fn run(mut self, calc: &mut RowCalculator<'_>, height: usize) -> Option<usize> {
        for i in 0..height {
            calc.reset(self.left);
            for j in self.left..self.right {
                let cell = calc.cell(i, j);
                if cell > self.limit && j == self.left {
                    self.left += 1;
                }
            }
            if self.left >= self.right {
                trace!("band exhausted at row {} of {} (limit {})", i + 1, height, self.limit);
                return None;
            }
            if self.right < self.width && calc.value(self.right) <= self.limit {
                self.right += 1;
            }
        }

        // Columns never reached by the band still hold their seed values,
        // which are all larger than the limit.
        let distance = calc.value(self.width);
        (distance <= self.limit).then_some(distance)
    }
}

/// Bounded distance between two strings under the given recurrence
pub(crate) fn bounded_distance(a: &str, b: &str, bound: Bound, metric: Metric) -> Option<usize> {
    if bound == Bound::AtMost(0) {
        return (a == b).then_some(0);
    }

    let a_chars = code_points(a);
    let b_chars = code_points(b);
    let (s1, s2) = longer_first(&a_chars, &b_chars);
    let height = s1.len();
    let width = s2.len();

    let limit = match bound {
        Bound::Unbounded => height,
        Bound::AtMost(k) => {
            if height - width > k {
                return None;
            }
            k
        }
    };

    if width == 0 {
        return (height <= limit).then_some(height);
    }

    let mut calc = RowCalculator::new(metric, s1, s2);
    Band::new(width, limit).run(&mut calc, height)
}
