//! N-gram decomposition and set similarity
//!
//! A string is shingled into the *set* of its contiguous n-code-point
//! substrings; duplicates collapse. With padding, `n - 1` pad characters are
//! added on each side so the first and last characters appear in as many grams
//! as interior ones.
//!
//! Two gram sets are compared with the Otsuka-Ochiai coefficient,
//! `|A ∩ B| / sqrt(|A| * |B|)`.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use super::Similarity;
use crate::error::{ConfigError, Result};

/// Gram size used by the similarity dispatcher
pub const DEFAULT_GRAM_SIZE: usize = 3;

/// Default padding character
pub const DEFAULT_PAD_CHAR: char = ' ';

/// Set of distinct grams of one string
pub type GramSet = AHashSet<String>;

/// Splits strings into gram sets and scores the overlap of two sets.
///
/// [`NgramIndex`](crate::indexing::NgramIndex) is generic over this trait, so
/// an index can be built over any shingling scheme.
pub trait Splitter: Send + Sync {
    /// Distinct grams of `s`
    fn split(&self, s: &str) -> GramSet;

    /// Otsuka-Ochiai coefficient of the two gram sets.
    ///
    /// Equal strings score 1.0. Otherwise a string that yields no grams
    /// scores 0.0 against anything.
    fn set_similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        ochiai(&self.split(a), &self.split(b))
    }
}

/// Otsuka-Ochiai coefficient of two gram sets, 0.0 if either is empty
#[must_use]
pub fn ochiai(a: &GramSet, b: &GramSet) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let intersection = small.iter().filter(|gram| large.contains(*gram)).count();
    intersection as f64 / ((a.len() * b.len()) as f64).sqrt()
}

/// Serializable n-gram parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NgramConfig {
    /// Gram size in code points, at least 1
    pub n: usize,
    /// Pad both ends with `n - 1` copies of `pad_char`
    pub padded: bool,
    pub pad_char: char,
}

impl Default for NgramConfig {
    fn default() -> Self {
        Self {
            n: DEFAULT_GRAM_SIZE,
            padded: true,
            pad_char: DEFAULT_PAD_CHAR,
        }
    }
}

impl NgramConfig {
    /// Config with the default pad character; fails on a zero gram size
    pub fn new(n: usize, padded: bool) -> Result<Self> {
        Self {
            n,
            padded,
            pad_char: DEFAULT_PAD_CHAR,
        }
        .validate()
    }

    pub fn validate(self) -> Result<Self> {
        if self.n == 0 {
            return Err(ConfigError::InvalidGramSize(self.n));
        }
        Ok(self)
    }
}

/// N-gram splitter and similarity calculator
///
/// Construction validates the gram size, so splitting never fails.
///
/// # Complexity
/// - Time: O(m + n) grams per comparison, each hashed once
/// - Space: O(m + n) for the two gram sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ngram {
    n: usize,
    padded: bool,
    pad_char: char,
}

impl Default for Ngram {
    fn default() -> Self {
        Self::trigram()
    }
}

impl Ngram {
    /// Padded splitter of gram size `n`
    pub fn new(n: usize) -> Result<Self> {
        Self::from_config(NgramConfig::new(n, true)?)
    }

    pub fn from_config(config: NgramConfig) -> Result<Self> {
        let config = config.validate()?;
        Ok(Self {
            n: config.n,
            padded: config.padded,
            pad_char: config.pad_char,
        })
    }

    #[must_use]
    pub fn config(&self) -> NgramConfig {
        NgramConfig {
            n: self.n,
            padded: self.padded,
            pad_char: self.pad_char,
        }
    }

    #[must_use]
    pub fn bigram() -> Self {
        Self {
            n: 2,
            padded: true,
            pad_char: DEFAULT_PAD_CHAR,
        }
    }

    #[must_use]
    pub fn trigram() -> Self {
        Self {
            n: DEFAULT_GRAM_SIZE,
            padded: true,
            pad_char: DEFAULT_PAD_CHAR,
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padded: bool) -> Self {
        self.padded = padded;
        self
    }

    #[must_use]
    pub fn with_pad_char(mut self, pad_char: char) -> Self {
        self.pad_char = pad_char;
        self
    }

    #[must_use]
    pub fn n(&self) -> usize {
        self.n
    }

    #[must_use]
    pub fn is_padded(&self) -> bool {
        self.padded
    }

    /// Grams of `s` in order of appearance, duplicates included
    #[must_use]
    pub fn grams(&self, s: &str) -> Vec<String> {
        let pad = if self.padded { self.n - 1 } else { 0 };
        let mut chars: Vec<char> = Vec::with_capacity(s.len() + 2 * pad);
        chars.extend(std::iter::repeat(self.pad_char).take(pad));
        chars.extend(s.chars());
        chars.extend(std::iter::repeat(self.pad_char).take(pad));

        // Unpadded strings shorter than n have no grams
        chars.windows(self.n).map(|w| w.iter().collect()).collect()
    }
}

impl Splitter for Ngram {
    fn split(&self, s: &str) -> GramSet {
        self.grams(s).into_iter().collect()
    }
}

impl Similarity for Ngram {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        self.set_similarity(a, b)
    }

    fn name(&self) -> &'static str {
        "ngram"
    }
}

/// Distinct n-grams of `s`.
///
/// # Example
/// ```
/// use fuzzband::algorithms::ngram::ngram_split;
///
/// let grams = ngram_split("abc", 2, false).unwrap();
/// assert_eq!(grams.len(), 2);
/// assert!(grams.contains("ab") && grams.contains("bc"));
///
/// assert!(ngram_split("abc", 0, true).is_err());
/// ```
pub fn ngram_split(s: &str, n: usize, padded: bool) -> Result<GramSet> {
    Ok(Ngram::from_config(NgramConfig::new(n, padded)?)?.split(s))
}

/// Otsuka-Ochiai similarity of the n-gram sets of `a` and `b`
pub fn ngram_set_similarity(a: &str, b: &str, n: usize, padded: bool) -> Result<f64> {
    Ok(Ngram::from_config(NgramConfig::new(n, padded)?)?.set_similarity(a, b))
}

/// Padded bigram similarity
#[inline]
#[must_use]
pub fn bigram_similarity(a: &str, b: &str) -> f64 {
    Ngram::bigram().set_similarity(a, b)
}

/// Padded trigram similarity
#[inline]
#[must_use]
pub fn trigram_similarity(a: &str, b: &str) -> f64 {
    Ngram::trigram().set_similarity(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.001
    }

    fn set(grams: &[&str]) -> GramSet {
        grams.iter().map(|g| g.to_string()).collect()
    }

    #[test]
    fn test_split() {
        assert_eq!(ngram_split("abc", 2, false).unwrap(), set(&["ab", "bc"]));
        assert_eq!(ngram_split("abc", 2, true).unwrap(), set(&[" a", "ab", "bc", "c "]));
        assert_eq!(ngram_split("ab", 3, true).unwrap(), set(&["  a", " ab", "ab ", "b  "]));
    }

    #[test]
    fn test_split_collapses_duplicates() {
        let bigram = Ngram::bigram().with_padding(false);
        assert_eq!(bigram.grams("aaaa").len(), 3);
        assert_eq!(bigram.split("aaaa"), set(&["aa"]));
    }

    #[test]
    fn test_split_short_and_empty() {
        assert!(ngram_split("ab", 3, false).unwrap().is_empty());
        assert!(ngram_split("", 2, false).unwrap().is_empty());
        // Two pads fill one bigram window on their own
        assert_eq!(ngram_split("", 2, true).unwrap(), set(&["  "]));
        assert_eq!(ngram_split("日本", 2, true).unwrap(), set(&[" 日", "日本", "本 "]));
    }

    #[test]
    fn test_zero_gram_size_rejected() {
        assert_eq!(ngram_split("abc", 0, true), Err(ConfigError::InvalidGramSize(0)));
        assert_eq!(ngram_set_similarity("a", "b", 0, false), Err(ConfigError::InvalidGramSize(0)));
        assert!(Ngram::new(0).is_err());
    }

    #[test]
    fn test_ochiai() {
        // {" n", "ht", "t "} shared out of 6 bigrams each
        assert!(approx_eq(bigram_similarity("night", "nacht"), 0.5));
        assert!(approx_eq(trigram_similarity("happiness", "princess"), 0.286));
        assert!(approx_eq(trigram_similarity("hello", "hallo"), 0.5714));
        assert!(approx_eq(trigram_similarity("DWAYNE", "DUANE"), 0.4009));
        assert_eq!(trigram_similarity("abcde", "fghij"), 0.0);
    }

    #[test]
    fn test_ochiai_edges() {
        assert_eq!(trigram_similarity("abc", "abc"), 1.0);
        assert_eq!(trigram_similarity("", ""), 1.0);
        assert_eq!(ngram_set_similarity("ab", "abc", 3, false).unwrap(), 0.0);
        assert_eq!(ochiai(&GramSet::default(), &set(&["ab"])), 0.0);
    }

    #[test]
    fn test_config() {
        let ngram = Ngram::from_config(NgramConfig::default()).unwrap();
        assert_eq!(ngram, Ngram::trigram());
        assert_eq!(ngram.config().n, 3);
        assert_eq!(ngram.name(), "ngram");

        let custom = Ngram::bigram().with_pad_char('#');
        assert!(custom.split("ab").contains("#a"));
    }
}
