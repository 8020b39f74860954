//! Code point sequences
//!
//! All metrics compare Unicode scalar values, never bytes: "café" has four
//! units, not five. Sequences live on the stack for typical word-sized inputs.

use smallvec::SmallVec;

/// Ordered code points of one input string
pub type CodePoints = SmallVec<[char; 64]>;

/// Collect the code points of `s`
#[inline]
#[must_use]
pub fn code_points(s: &str) -> CodePoints {
    s.chars().collect()
}

/// Order two sequences as `(longer, shorter)`; equal lengths keep argument order
#[inline]
#[must_use]
pub fn longer_first<'a>(a: &'a [char], b: &'a [char]) -> (&'a [char], &'a [char]) {
    if a.len() >= b.len() {
        (a, b)
    } else {
        (b, a)
    }
}

/// Order two sequences as `(shorter, longer)`; equal lengths keep argument order
#[inline]
#[must_use]
pub fn shorter_first<'a>(a: &'a [char], b: &'a [char]) -> (&'a [char], &'a [char]) {
    if a.len() <= b.len() {
        (a, b)
    } else {
        (b, a)
    }
}

/// Length of the common prefix of two strings, in code points
#[inline]
#[must_use]
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(ac, bc)| ac == bc)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_points_not_bytes() {
        assert_eq!(code_points("café").len(), 4);
        assert_eq!(code_points("日本語").len(), 3);
        assert!(code_points("").is_empty());
    }

    #[test]
    fn test_canonical_ordering() {
        let a = code_points("abc");
        let b = code_points("abcdef");
        assert_eq!(longer_first(&a, &b).0.len(), 6);
        assert_eq!(shorter_first(&a, &b).0.len(), 3);
        assert_eq!(shorter_first(&b, &a).0.len(), 3);
    }

    #[test]
    fn test_common_prefix() {
        assert_eq!(common_prefix_len("prefix", "preface"), 4);
        assert_eq!(common_prefix_len("", "abc"), 0);
        assert_eq!(common_prefix_len("日本語", "日本"), 2);
    }
}
