//! Levenshtein (edit) distance
//!
//! Insertions, deletions and substitutions each cost 1. The matrix is filled
//! through the banded driver in [`super::banded`], which keeps one rolling row
//! of prefix distances plus a single carried diagonal value.

use smallvec::SmallVec;

use super::banded::{bounded_distance, Bound, Metric};
use super::EditDistance;

/// One rolling row of the prefix-distance matrix
///
/// `row[j]` holds the distance between the processed prefix of the longer
/// sequence and the first `j` code points of the shorter one. Cells are
/// overwritten left to right; `diagonal` carries the pre-overwrite value of
/// the cell to the upper left.
pub(crate) struct LevenshteinRow<'a> {
    s1: &'a [char],
    s2: &'a [char],
    row: SmallVec<[usize; 64]>,
    diagonal: usize,
}

impl<'a> LevenshteinRow<'a> {
    pub(crate) fn new(s1: &'a [char], s2: &'a [char]) -> Self {
        Self {
            s1,
            s2,
            row: (0..=s2.len()).collect(),
            diagonal: 0,
        }
    }

    #[inline]
    pub(crate) fn reset(&mut self, left: usize) {
        self.diagonal = self.row[left];
        self.row[left] += 1;
    }

    #[inline]
    pub(crate) fn cell(&mut self, i: usize, j: usize) -> usize {
        let substitution = self.diagonal + usize::from(self.s1[i] != self.s2[j]);
        let insertion = self.row[j] + 1;
        let deletion = self.row[j + 1] + 1;

        self.diagonal = self.row[j + 1];
        let cell = substitution.min(insertion).min(deletion);
        self.row[j + 1] = cell;
        cell
    }

    #[inline]
    pub(crate) fn value(&self, j: usize) -> usize {
        self.row[j]
    }
}

/// Levenshtein distance calculator with an optional bound
///
/// # Complexity
/// - Time: O(k * n) for a bound `k` over strings of length up to `n`,
///   O(m * n) unbounded
/// - Space: O(min(m, n))
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Levenshtein {
    /// Distance limit; `Unbounded` computes the exact value
    pub bound: Bound,
}

impl Levenshtein {
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
        levenshtein_distance(a, b, self.bound)
    }
}

impl EditDistance for Levenshtein {
    fn distance(&self, a: &str, b: &str) -> Option<usize> {
        self.compute(a, b)
    }

    fn name(&self) -> &'static str {
        "levenshtein"
    }
}

/// Compute the Levenshtein distance between `a` and `b` within `bound`.
///
/// Returns `None` when the distance is provably larger than the bound. That
/// is an ordinary answer to a bounded query, not a failure.
///
/// # Example
/// ```
/// use fuzzband::algorithms::levenshtein::levenshtein_distance;
/// use fuzzband::algorithms::Bound;
///
/// assert_eq!(levenshtein_distance("Something", "Smothing", Bound::AtMost(5)), Some(2));
/// assert_eq!(levenshtein_distance("Something", "Som", Bound::AtMost(5)), None);
/// assert_eq!(levenshtein_distance("kitten", "sitting", Bound::Unbounded), Some(3));
/// ```
#[inline]
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str, bound: impl Into<Bound>) -> Option<usize> {
    bounded_distance(a, b, bound.into(), Metric::Levenshtein)
}

/// Exact Levenshtein distance
#[inline]
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    // Unbounded queries always produce a value
    levenshtein_distance(a, b, Bound::Unbounded).unwrap_or_default()
}

/// Normalized similarity `1 - distance / max_len`, 1.0 for two empty strings
#[inline]
#[must_use]
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    Levenshtein::new().similarity(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_basic() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", "abc"), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("saturday", "sunday"), 3);
        assert_eq!(levenshtein("ab", "ba"), 2);
    }

    #[test]
    fn test_levenshtein_unicode() {
        assert_eq!(levenshtein("café", "cafe"), 1);
        assert_eq!(levenshtein("日本語", "日本"), 1);
    }

    #[test]
    fn test_levenshtein_bounded() {
        let cases: [(&str, &str, usize, Option<usize>); 10] = [
            ("Something", "Smothing", 2, Some(2)),
            ("Something", "Smoething", 2, Some(2)),
            ("Something", "Some", 5, Some(5)),
            ("Something", "Som", 5, None),
            ("Something", "Smoke the king", 7, Some(6)),
            ("Something", "Smoke the king", 5, None),
            ("happiness", "princess", 4, Some(4)),
            ("accabb", "bbabbabb", 4, Some(4)),
            ("abba", "abba", 0, Some(0)),
            ("abba", "abbb", 0, None),
        ];
        for (a, b, bound, expected) in cases {
            assert_eq!(levenshtein_distance(a, b, bound), expected, "{}/{}", a, b);
            assert_eq!(levenshtein_distance(b, a, bound), expected, "{}/{}", b, a);
        }
    }

    #[test]
    fn test_levenshtein_struct_compute() {
        let lev = Levenshtein::with_bound(2usize);
        assert_eq!(lev.compute("abc", "abd"), Some(1));
        assert_eq!(lev.compute("abc", "xyz"), None);

        let unbounded = Levenshtein::new();
        assert_eq!(unbounded.compute("abc", "xyz"), Some(3));
        assert_eq!(unbounded.name(), "levenshtein");
    }

    #[test]
    fn test_levenshtein_similarity() {
        assert!((levenshtein_similarity("happiness", "princess") - 5.0 / 9.0).abs() < 1e-9);
        assert!((levenshtein_similarity("", "") - 1.0).abs() < 1e-9);
        // Bounded calculators score an exceeded bound as zero
        assert_eq!(Levenshtein::with_bound(1usize).similarity("abc", "xyz"), 0.0);
    }
}
