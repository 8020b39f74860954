//! Configuration errors
//!
//! Every computation in this crate is total over its inputs. The only way to
//! fail is to hand a constructor a parameter that has no meaning (a zero gram
//! size, a bound below the unbounded sentinel, a threshold outside `[0, 1]`),
//! and those are rejected up front instead of producing degenerate scores.

use thiserror::Error;

/// Errors raised while validating configuration values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// N-gram size must be at least one code point
    #[error("gram size must be at least 1, got {0}")]
    InvalidGramSize(usize),

    /// Raw distance bound below the `-1` unbounded sentinel
    #[error("distance bound must be -1 (unbounded) or non-negative, got {0}")]
    NegativeBound(i64),

    /// Similarity threshold that is NaN, infinite or outside `[0.0, 1.0]`
    #[error("threshold must be a finite number in [0.0, 1.0], got {0}")]
    InvalidThreshold(f64),

    /// Jaro-Winkler prefix weight outside `[0.0, 0.25]`
    #[error("prefix weight must be in [0.0, 0.25], got {0}")]
    InvalidPrefixWeight(f64),

    /// Algorithm name that does not map to a known metric
    #[error("unknown algorithm '{0}', expected one of: levenshtein, damerau_levenshtein, jaro, jaro_winkler, ngram")]
    UnknownAlgorithm(String),
}

/// Result alias used by the validating constructors
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Validate that a threshold is a finite value in `[0.0, 1.0]`
pub(crate) fn validate_threshold(value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidThreshold(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_validation() {
        assert_eq!(validate_threshold(0.0), Ok(0.0));
        assert_eq!(validate_threshold(1.0), Ok(1.0));
        assert!(validate_threshold(1.5).is_err());
        assert!(validate_threshold(-0.1).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
    }

    #[test]
    fn test_error_messages_name_the_value() {
        let msg = ConfigError::InvalidGramSize(0).to_string();
        assert!(msg.contains("at least 1"));
        let msg = ConfigError::NegativeBound(-7).to_string();
        assert!(msg.contains("-7"));
    }
}
