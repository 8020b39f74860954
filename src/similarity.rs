//! Thresholded similarity over every supported algorithm
//!
//! [`similarity`] turns any metric into a score in `[0, 1]`:
//!
//! - two empty strings score 1.0 and exactly one empty string scores 0.0,
//!   whatever the algorithm;
//! - edit distances are bounded by what the threshold still allows, so a
//!   hopeless pair stops early and scores 0.0;
//! - any score below the threshold is reported as 0.0.
//!
//! Scores at or above the threshold are returned unchanged.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::algorithms::damerau::damerau_levenshtein_distance;
use crate::algorithms::jaro::{jaro_similarity, jaro_winkler_similarity};
use crate::algorithms::levenshtein::levenshtein_distance;
use crate::algorithms::ngram::{Ngram, Splitter};
use crate::algorithms::{Bound, Similarity};
use crate::error::{validate_threshold, ConfigError, Result};
use crate::PARALLEL_THRESHOLD;

/// Absorbs float error in `(1 - threshold) * len` so that e.g. a 0.9
/// threshold over 10 characters allows one edit, not zero
const BOUND_EPSILON: f64 = 1e-9;

/// Metric used by [`similarity`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Levenshtein,
    #[serde(alias = "damerau")]
    DamerauLevenshtein,
    Jaro,
    JaroWinkler,
    /// Padded trigrams, Otsuka-Ochiai
    #[serde(rename = "ngram", alias = "trigram")]
    NGram,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Levenshtein,
        Algorithm::DamerauLevenshtein,
        Algorithm::Jaro,
        Algorithm::JaroWinkler,
        Algorithm::NGram,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Levenshtein => "levenshtein",
            Algorithm::DamerauLevenshtein => "damerau_levenshtein",
            Algorithm::Jaro => "jaro",
            Algorithm::JaroWinkler => "jaro_winkler",
            Algorithm::NGram => "ngram",
        }
    }

    /// Whether scores come from a bounded edit distance
    #[must_use]
    pub fn is_edit_distance(self) -> bool {
        matches!(self, Algorithm::Levenshtein | Algorithm::DamerauLevenshtein)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "levenshtein" => Ok(Algorithm::Levenshtein),
            "damerau_levenshtein" | "damerau" => Ok(Algorithm::DamerauLevenshtein),
            "jaro" => Ok(Algorithm::Jaro),
            "jaro_winkler" => Ok(Algorithm::JaroWinkler),
            "ngram" | "trigram" => Ok(Algorithm::NGram),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Largest distance that can still reach `threshold` over `longest` code points
fn threshold_bound(threshold: f64, longest: usize) -> usize {
    // NaN and negative products land on zero through `max`
    let raw = ((1.0 - threshold) * longest as f64 + BOUND_EPSILON).floor().max(0.0);
    raw as usize
}

fn edit_similarity(a: &str, b: &str, algorithm: Algorithm, threshold: f64) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    let bound = Bound::AtMost(threshold_bound(threshold, longest));
    let distance = match algorithm {
        Algorithm::DamerauLevenshtein => damerau_levenshtein_distance(a, b, bound),
        _ => levenshtein_distance(a, b, bound),
    };
    distance.map_or(0.0, |d| 1.0 - d as f64 / longest as f64)
}

/// Similarity of `a` and `b` under `algorithm`, gated by `threshold`.
///
/// Returns a value in `[0.0, 1.0]`. A result of 0.0 does not distinguish
/// "below threshold" from "nothing in common".
///
/// # Example
/// ```
/// use fuzzband::similarity::{similarity, Algorithm};
///
/// let score = similarity("happiness", "princess", Algorithm::Levenshtein, 0.0);
/// assert!((score - 0.5556).abs() < 1e-3);
///
/// // Same pair, but the threshold leaves no room for four edits
/// assert_eq!(similarity("happiness", "princess", Algorithm::Levenshtein, 0.6), 0.0);
/// assert_eq!(similarity("", "", Algorithm::Jaro, 0.9), 1.0);
/// ```
#[must_use]
pub fn similarity(a: &str, b: &str, algorithm: Algorithm, threshold: f64) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }

    let score = match algorithm {
        Algorithm::Levenshtein | Algorithm::DamerauLevenshtein => {
            edit_similarity(a, b, algorithm, threshold)
        }
        Algorithm::Jaro => jaro_similarity(a, b),
        Algorithm::JaroWinkler => jaro_winkler_similarity(a, b),
        Algorithm::NGram => Ngram::trigram().set_similarity(a, b),
    };

    if score < threshold {
        0.0
    } else {
        score
    }
}

/// Score every `(a, b)` pair, in parallel for large batches
#[must_use]
pub fn batch_similarity<A, B>(pairs: &[(A, B)], algorithm: Algorithm, threshold: f64) -> Vec<f64>
where
    A: AsRef<str> + Sync,
    B: AsRef<str> + Sync,
{
    let score = |(a, b): &(A, B)| similarity(a.as_ref(), b.as_ref(), algorithm, threshold);
    if pairs.len() >= PARALLEL_THRESHOLD {
        pairs.par_iter().map(score).collect()
    } else {
        pairs.iter().map(score).collect()
    }
}

/// Serializable [`Matcher`] settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub algorithm: Algorithm,
    /// Minimum score to report, within `[0.0, 1.0]`
    pub threshold: f64,
}

/// Candidate scored against a query
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Position in the candidate list
    pub id: usize,
    pub text: String,
    pub score: f64,
}

/// An algorithm paired with a validated threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matcher {
    algorithm: Algorithm,
    threshold: f64,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            threshold: 0.0,
        }
    }
}

impl Matcher {
    /// Fails if `threshold` is not a finite value in `[0.0, 1.0]`
    pub fn new(algorithm: Algorithm, threshold: f64) -> Result<Self> {
        Ok(Self {
            algorithm,
            threshold: validate_threshold(threshold)?,
        })
    }

    pub fn from_config(config: MatcherConfig) -> Result<Self> {
        Self::new(config.algorithm, config.threshold)
    }

    #[must_use]
    pub fn config(&self) -> MatcherConfig {
        MatcherConfig {
            algorithm: self.algorithm,
            threshold: self.threshold,
        }
    }

    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[inline]
    #[must_use]
    pub fn score(&self, a: &str, b: &str) -> f64 {
        similarity(a, b, self.algorithm, self.threshold)
    }

    /// Candidates scoring above zero, best first, ties by position.
    ///
    /// At most `limit` results are returned.
    pub fn find_best_matches<S>(&self, query: &str, choices: &[S], limit: usize) -> Vec<MatchResult>
    where
        S: AsRef<str> + Sync,
    {
        let score = |(id, choice): (usize, &S)| {
            let text = choice.as_ref();
            let score = self.score(query, text);
            (score > 0.0).then(|| MatchResult {
                id,
                text: text.to_string(),
                score,
            })
        };

        let mut results: Vec<MatchResult> = if choices.len() >= PARALLEL_THRESHOLD {
            choices.par_iter().enumerate().filter_map(score).collect()
        } else {
            choices.iter().enumerate().filter_map(score).collect()
        };

        // Scores are never NaN, so total_cmp agrees with numeric order
        results.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.id.cmp(&b.id)));
        results.truncate(limit);
        results
    }
}

impl Similarity for Matcher {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        self.score(a, b)
    }

    fn name(&self) -> &'static str {
        self.algorithm.name()
    }
}
