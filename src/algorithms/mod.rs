//! Core string similarity algorithms
//!
//! Each algorithm is implemented as a standalone function for composability,
//! plus a trait-based interface for extensibility.

pub mod banded;
pub mod damerau;
pub mod jaro;
pub mod levenshtein;
pub mod ngram;
pub mod priority_tree;
pub mod sequence;

pub use banded::Bound;
pub use damerau::*;
pub use jaro::*;
pub use levenshtein::*;
pub use ngram::*;
pub use priority_tree::PriorityTree;

/// Trait for all similarity metrics.
/// Returns a value between 0.0 (completely different) and 1.0 (identical).
pub trait Similarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;

    /// Convenience method for distance (1.0 - similarity)
    fn distance(&self, a: &str, b: &str) -> f64 {
        1.0 - self.similarity(a, b)
    }

    /// Name of the algorithm for debugging/logging
    fn name(&self) -> &'static str;
}

/// Trait for bounded edit distance algorithms
///
/// `None` means the distance is larger than the calculator's bound.
pub trait EditDistance: Send + Sync {
    fn distance(&self, a: &str, b: &str) -> Option<usize>;

    /// Normalized score `1 - distance / max_len`.
    ///
    /// Two empty strings score 1.0; a distance over the bound scores 0.0.
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let max_len = a.chars().count().max(b.chars().count());
        if max_len == 0 {
            return 1.0;
        }
        self.distance(a, b)
            .map_or(0.0, |dist| 1.0 - dist as f64 / max_len as f64)
    }

    fn name(&self) -> &'static str;
}

/// Blanket implementation: any EditDistance is also a Similarity
impl<T: EditDistance> Similarity for T {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        EditDistance::similarity(self, a, b)
    }

    fn name(&self) -> &'static str {
        EditDistance::name(self)
    }
}
