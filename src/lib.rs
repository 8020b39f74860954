//! fuzzband - bounded string similarity
//!
//! Approximate string comparison for spell-checkers, deduplication and fuzzy
//! search, built around answers that stay cheap when strings are far apart.
//!
//! # Features
//! - Levenshtein and Damerau-Levenshtein distances computed on a shrinking
//!   band of the distance matrix, stopping as soon as a bound is exceeded
//! - Jaro and Jaro-Winkler similarity with a tree-backed sliding match window
//! - N-gram sets, Otsuka-Ochiai similarity and an inverted index for
//!   nearest-match search
//! - One thresholded entry point, [`similarity`](similarity::similarity), over
//!   all of them
//! - Unicode support: every length is counted in code points
//!
//! # Example
//! ```
//! use fuzzband::{levenshtein_distance, similarity, Algorithm, Bound, NgramIndex};
//!
//! assert_eq!(levenshtein_distance("Something", "Smothing", Bound::AtMost(5)), Some(2));
//! assert_eq!(levenshtein_distance("Something", "Som", Bound::AtMost(5)), None);
//!
//! let score = similarity("happiness", "princess", Algorithm::Jaro, 0.0);
//! assert!((score - 0.8056).abs() < 1e-3);
//!
//! let mut index = NgramIndex::new(3, true).unwrap();
//! index.add_all(["apple", "banana", "cherry"]);
//! assert_eq!(index.search("cherri"), Some(2));
//! ```

pub mod algorithms;
pub mod error;
pub mod indexing;
pub mod similarity;

pub use algorithms::{Bound, EditDistance, Similarity};
pub use algorithms::damerau::{damerau_levenshtein_distance, DamerauLevenshtein};
pub use algorithms::jaro::{jaro_similarity, jaro_winkler_similarity, Jaro, JaroWinkler, JaroWinklerConfig};
pub use algorithms::levenshtein::{levenshtein_distance, Levenshtein};
pub use algorithms::ngram::{ngram_set_similarity, ngram_split, Ngram, NgramConfig, Splitter};
pub use error::{ConfigError, Result};
pub use indexing::{NgramIndex, SearchMatch, SharedNgramIndex};
pub use similarity::{batch_similarity, similarity, Algorithm, MatchResult, Matcher, MatcherConfig};

/// Minimum input size for parallel processing.
///
/// Below this, sequential iteration beats the cost of handing work to the
/// rayon thread pool for comparisons this cheap.
pub(crate) const PARALLEL_THRESHOLD: usize = 100;
