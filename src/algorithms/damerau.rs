//! Damerau-Levenshtein distance
//!
//! Extends Levenshtein with adjacent transpositions at cost 1. This is the
//! restricted variant (optimal string alignment): a transposed pair is not
//! edited again.
//!
//! Detecting a swap needs the row two steps back. Two rolling rows are kept
//! (`last` for the row being overwritten, `prev` for the one before it) and a
//! two-slot window carries the two-rows-back values that `prev` overwrites as
//! the inner loop moves right.

use smallvec::SmallVec;

use super::banded::{bounded_distance, Bound, Metric};
use super::EditDistance;

/// Rolling rows for the optimal-string-alignment recurrence
pub(crate) struct DamerauRows<'a> {
    s1: &'a [char],
    s2: &'a [char],
    last: SmallVec<[usize; 64]>,
    prev: SmallVec<[usize; 64]>,
    window: [usize; 2],
}

impl<'a> DamerauRows<'a> {
    pub(crate) fn new(s1: &'a [char], s2: &'a [char]) -> Self {
        Self {
            s1,
            s2,
            last: (0..=s2.len()).collect(),
            prev: (0..=s2.len()).collect(),
            window: [0; 2],
        }
    }

    /// Shift column `j` back one row and store `next` in its place.
    ///
    /// Afterwards `window[1]` is the two-rows-back value at `j` and
    /// `window[0]` the one at `j - 1`.
    #[inline]
    fn rotate(&mut self, j: usize, next: usize) -> usize {
        self.window = [self.window[1], self.prev[j]];
        self.prev[j] = self.last[j];
        self.last[j] = next;
        next
    }

    #[inline]
    pub(crate) fn reset(&mut self, left: usize) {
        // Column left - 1 is outside the band and over the limit
        self.window[1] = usize::MAX;
        let seed = self.last[left] + 1;
        self.rotate(left, seed);
    }

    #[inline]
    pub(crate) fn cell(&mut self, i: usize, j: usize) -> usize {
        let substitution = self.prev[j] + usize::from(self.s1[i] != self.s2[j]);
        let insertion = self.last[j] + 1;
        let deletion = self.last[j + 1] + 1;
        let mut cell = substitution.min(insertion).min(deletion);

        if i > 0 && j > 0 && self.s1[i - 1] == self.s2[j] && self.s1[i] == self.s2[j - 1] {
            cell = cell.min(self.window[0].saturating_add(1));
        }

        self.rotate(j + 1, cell)
    }

    #[inline]
    pub(crate) fn value(&self, j: usize) -> usize {
        self.last[j]
    }
}

/// Damerau-Levenshtein distance calculator with an optional bound
///
/// # Complexity
/// - Time: O(k * n) for a bound `k`, O(m * n) unbounded
/// - Space: O(min(m, n)) for the two rolling rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamerauLevenshtein {
    /// Distance limit; `Unbounded` computes the exact value
    pub bound: Bound,
}

impl DamerauLevenshtein {
    #[must_use]
    pub fn new() -> Self {
        Self { bound: Bound::Unbounded }
    }

    #[must_use]
    pub fn with_bound(bound: impl Into<Bound>) -> Self {
        Self { bound: bound.into() }
    }

    /// Returns `None` if the distance exceeds the bound.
    #[must_use]
    pub fn compute(&self, a: &str, b: &str) -> Option<usize> {
        damerau_levenshtein_distance(a, b, self.bound)
    }
}

impl EditDistance for DamerauLevenshtein {
    fn distance(&self, a: &str, b: &str) -> Option<usize> {
        self.compute(a, b)
    }

    fn name(&self) -> &'static str {
        "damerau_levenshtein"
    }
}

/// Compute the restricted Damerau-Levenshtein distance within `bound`.
///
/// Returns `None` when the distance is provably larger than the bound.
///
/// # Example
/// ```
/// use fuzzband::algorithms::damerau::damerau_levenshtein_distance;
/// use fuzzband::algorithms::Bound;
///
/// // One adjacent swap
/// assert_eq!(damerau_levenshtein_distance("Something", "Smoething", Bound::AtMost(5)), Some(1));
/// assert_eq!(damerau_levenshtein_distance("permutation", "permtuation", Bound::Unbounded), Some(1));
/// ```
#[inline]
#[must_use]
pub fn damerau_levenshtein_distance(a: &str, b: &str, bound: impl Into<Bound>) -> Option<usize> {
    bounded_distance(a, b, bound.into(), Metric::Damerau)
}

/// Exact restricted Damerau-Levenshtein distance
#[inline]
#[must_use]
pub fn damerau_levenshtein(a: &str, b: &str) -> usize {
    damerau_levenshtein_distance(a, b, Bound::Unbounded).unwrap_or_default()
}

/// Normalized similarity `1 - distance / max_len`, 1.0 for two empty strings
#[inline]
#[must_use]
pub fn damerau_levenshtein_similarity(a: &str, b: &str) -> f64 {
    DamerauLevenshtein::new().similarity(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::levenshtein::levenshtein_distance;

    #[test]
    fn test_damerau_basic() {
        assert_eq!(damerau_levenshtein("", ""), 0);
        assert_eq!(damerau_levenshtein("abc", "abc"), 0);
        assert_eq!(damerau_levenshtein("ab", "ba"), 1);
        assert_eq!(damerau_levenshtein("abc", "acb"), 1);
        assert_eq!(damerau_levenshtein("kitten", "sitting"), 3);
        assert_eq!(damerau_levenshtein("permutation", "permtuation"), 1);
    }

    #[test]
    fn test_damerau_bounded() {
        let cases: [(&str, &str, usize, Option<usize>); 10] = [
            ("Something", "Smothing", 2, Some(2)),
            ("Something", "Smoething", 2, Some(1)),
            ("Something", "Some", 5, Some(5)),
            ("Something", "Som", 5, None),
            ("Something", "Smoke the king", 6, Some(6)),
            ("happiness", "princess", 4, Some(4)),
            ("accabb", "bbabbabb", 4, Some(4)),
            ("abba", "abba", 0, Some(0)),
            ("abba", "abbb", 0, None),
            ("abba", "baab", 2, Some(2)),
        ];
        for (a, b, bound, expected) in cases {
            assert_eq!(damerau_levenshtein_distance(a, b, bound), expected, "{}/{}", a, b);
            assert_eq!(damerau_levenshtein_distance(b, a, bound), expected, "{}/{}", b, a);
        }
    }

    #[test]
    fn test_transposition_beats_levenshtein() {
        assert_eq!(levenshtein_distance("Something", "Smoething", 5usize), Some(2));
        assert_eq!(damerau_levenshtein_distance("Something", "Smoething", 5usize), Some(1));
        // Levenshtein needs two edits, so a bound of 1 only fits the swap
        assert_eq!(levenshtein_distance("fluffy", "fulffy", 1usize), None);
        assert_eq!(damerau_levenshtein_distance("fluffy", "fulffy", 1usize), Some(1));
    }

    #[test]
    fn test_damerau_struct_compute() {
        let dl = DamerauLevenshtein::with_bound(1usize);
        assert_eq!(dl.compute("abcd", "abdc"), Some(1));
        assert_eq!(dl.compute("abcd", "badc"), None);
        assert_eq!(dl.name(), "damerau_levenshtein");
        assert!((damerau_levenshtein_similarity("fluffy", "fulffy") - 5.0 / 6.0).abs() < 1e-9);
    }
}
