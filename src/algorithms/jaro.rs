//! Jaro and Jaro-Winkler similarity
//!
//! Characters of the shorter string are aligned against the longer one inside
//! a window of radius `len(longer) / 2`. Instead of rescanning the window for
//! every position, the still-open characters of the longer string are kept in
//! a [`PriorityTree`]: the window slides right by one insert per step and the
//! positions that fall off the left edge are evicted from the tree's minimum.
//!
//! Transpositions are counted as the number of aligned pairs that differ when
//! both match sequences are read in order. The count is not halved.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::priority_tree::PriorityTree;
use super::sequence::{code_points, common_prefix_len, shorter_first};
use super::Similarity;
use crate::error::{ConfigError, Result};

/// Default prefix scaling factor
pub const DEFAULT_PREFIX_WEIGHT: f64 = 0.1;

/// Largest prefix weight accepted by [`JaroWinklerConfig`]
pub const MAX_PREFIX_WEIGHT: f64 = 0.25;

/// Match marks for one Jaro computation
struct WindowedMatcher<'a> {
    s1: &'a [char],
    s2: &'a [char],
    marks1: SmallVec<[bool; 64]>,
    marks2: SmallVec<[bool; 64]>,
}

impl<'a> WindowedMatcher<'a> {
    /// `s1` must not be longer than `s2`
    fn new(s1: &'a [char], s2: &'a [char]) -> Self {
        Self {
            s1,
            s2,
            marks1: smallvec::smallvec![false; s1.len()],
            marks2: smallvec::smallvec![false; s2.len()],
        }
    }

    /// Mark aligned characters and return how many there are
    fn find_matches(&mut self) -> usize {
        let (s1, s2) = (self.s1, self.s2);
        let eps = s2.len() >> 1;
        let mut open = PriorityTree::with_capacity((2 * eps + 1).min(s2.len()));

        for (j, &c) in s2.iter().enumerate().take(eps) {
            open.insert(c, j);
        }

        let mut matches = 0;
        for (i, &c) in s1.iter().enumerate() {
            if let Some(&next) = s2.get(i + eps) {
                open.insert(next, i + eps);
            }
            while let Some(first) = open.peek_min() {
                if first + eps >= i {
                    break;
                }
                open.pop_min();
            }
            if let Some(j) = open.remove(c) {
                self.marks1[i] = true;
                self.marks2[j] = true;
                matches += 1;
            }
        }
        matches
    }

    /// Count aligned pairs that disagree, reading both match sequences in order
    fn transpositions(&self) -> usize {
        let matched1 = self.s1.iter().zip(&self.marks1).filter_map(|(c, &m)| m.then_some(c));
        let matched2 = self.s2.iter().zip(&self.marks2).filter_map(|(c, &m)| m.then_some(c));
        matched1.zip(matched2).filter(|(a, b)| a != b).count()
    }

    fn score(mut self) -> f64 {
        let m = self.find_matches();
        if m == 0 {
            return 0.0;
        }
        let t = self.transpositions();

        let m = m as f64;
        let l1 = self.s1.len() as f64;
        let l2 = self.s2.len() as f64;
        (m / l1 + m / l2 + (m - t as f64) / m) / 3.0
    }
}

/// Jaro similarity calculator
///
/// # Complexity
/// - Time: O(n log w) expected for a window of width `w`
/// - Space: O(m + n) for match marks plus the window tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Jaro;

impl Jaro {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Similarity for Jaro {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        jaro_similarity(a, b)
    }

    fn name(&self) -> &'static str {
        "jaro"
    }
}

/// Serializable Jaro-Winkler parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JaroWinklerConfig {
    /// Prefix scaling factor, within `[0.0, 0.25]`
    pub prefix_weight: f64,
    /// Longest prefix that earns a bonus; `None` uses the whole common prefix
    pub max_prefix_length: Option<usize>,
}

impl Default for JaroWinklerConfig {
    fn default() -> Self {
        Self {
            prefix_weight: DEFAULT_PREFIX_WEIGHT,
            max_prefix_length: None,
        }
    }
}

impl JaroWinklerConfig {
    /// Reject a prefix weight outside `[0.0, 0.25]`
    pub fn validate(self) -> Result<Self> {
        if !(0.0..=MAX_PREFIX_WEIGHT).contains(&self.prefix_weight) {
            return Err(ConfigError::InvalidPrefixWeight(self.prefix_weight));
        }
        Ok(self)
    }
}

/// Jaro-Winkler similarity calculator
///
/// Boosts the Jaro score by `l * prefix_weight * (1 - jaro)` where `l` is the
/// common prefix length of the raw inputs. The prefix is uncapped by default,
/// so long shared prefixes can push distinct strings to 1.0; the score never
/// goes above that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JaroWinkler {
    pub prefix_weight: f64,
    pub max_prefix_length: Option<usize>,
}

impl Default for JaroWinkler {
    fn default() -> Self {
        Self {
            prefix_weight: DEFAULT_PREFIX_WEIGHT,
            max_prefix_length: None,
        }
    }
}

impl JaroWinkler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a validated configuration
    pub fn from_config(config: JaroWinklerConfig) -> Result<Self> {
        let config = config.validate()?;
        Ok(Self {
            prefix_weight: config.prefix_weight,
            max_prefix_length: config.max_prefix_length,
        })
    }

    #[must_use]
    pub fn config(&self) -> JaroWinklerConfig {
        JaroWinklerConfig {
            prefix_weight: self.prefix_weight,
            max_prefix_length: self.max_prefix_length,
        }
    }

    /// Set the prefix weight, clamped to `[0.0, 0.25]`
    #[must_use]
    pub fn with_prefix_weight(mut self, weight: f64) -> Self {
        if !(0.0..=MAX_PREFIX_WEIGHT).contains(&weight) {
            log::warn!("prefix_weight {} clamped to [0.0, {}]", weight, MAX_PREFIX_WEIGHT);
        }
        self.prefix_weight = weight.clamp(0.0, MAX_PREFIX_WEIGHT);
        self
    }

    #[must_use]
    pub fn with_max_prefix_length(mut self, length: usize) -> Self {
        self.max_prefix_length = Some(length);
        self
    }
}

impl Similarity for JaroWinkler {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        jaro_winkler_similarity_params(a, b, self.prefix_weight, self.max_prefix_length)
    }

    fn name(&self) -> &'static str {
        "jaro_winkler"
    }
}

/// Jaro similarity in `[0.0, 1.0]`.
///
/// # Example
/// ```
/// use fuzzband::algorithms::jaro::jaro_similarity;
///
/// assert!((jaro_similarity("DWAYNE", "DUANE") - 0.8222).abs() < 1e-4);
/// assert_eq!(jaro_similarity("abc", "xyz"), 0.0);
/// ```
#[must_use]
pub fn jaro_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let a_chars = code_points(a);
    let b_chars = code_points(b);
    let (s1, s2) = shorter_first(&a_chars, &b_chars);
    if s1.is_empty() {
        // The other side is non-empty, otherwise the strings were equal
        return 0.0;
    }

    WindowedMatcher::new(s1, s2).score()
}

/// Jaro-Winkler similarity with an explicit prefix weight and optional prefix cap
#[must_use]
pub fn jaro_winkler_similarity_params(
    a: &str,
    b: &str,
    prefix_weight: f64,
    max_prefix_length: Option<usize>,
) -> f64 {
    let jaro = jaro_similarity(a, b);
    if jaro == 0.0 || jaro == 1.0 {
        return jaro;
    }

    let prefix = common_prefix_len(a, b);
    let prefix = max_prefix_length.map_or(prefix, |cap| prefix.min(cap));

    (jaro + prefix as f64 * prefix_weight * (1.0 - jaro)).min(1.0)
}

/// Jaro-Winkler similarity with scaling 0.1 and no prefix cap.
///
/// # Example
/// ```
/// use fuzzband::algorithms::jaro::jaro_winkler_similarity;
///
/// assert!((jaro_winkler_similarity("MARTHA", "MARHTA") - 0.9222).abs() < 1e-4);
/// // A long shared prefix saturates the score
/// assert_eq!(jaro_winkler_similarity("abcdefghijklmn", "abcdefghijklmx"), 1.0);
/// ```
#[inline]
#[must_use]
pub fn jaro_winkler_similarity(a: &str, b: &str) -> f64 {
    jaro_winkler_similarity_params(a, b, DEFAULT_PREFIX_WEIGHT, None)
}

#[inline]
#[must_use]
pub fn jaro_distance(a: &str, b: &str) -> f64 {
    1.0 - jaro_similarity(a, b)
}

#[inline]
#[must_use]
pub fn jaro_winkler_distance(a: &str, b: &str) -> f64 {
    1.0 - jaro_winkler_similarity(a, b)
}
