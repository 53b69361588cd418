//! Error types for curve-based spread calculations.

use thiserror::Error;

/// A specialized Result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Errors raised by the spread engines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Malformed curve input (length mismatch, empty curve,
    /// non-increasing maturities).
    #[error("Invalid curve: {reason}")]
    InvalidCurve {
        /// Description of what is invalid.
        reason: String,
    },

    /// Invalid engine configuration.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of what is invalid.
        reason: String,
    },

    /// Spread solve failed or left its valid range.
    #[error("Solver error: {0}")]
    Solver(#[from] tenor_math::MathError),
}

impl AnalyticsError {
    /// Creates an invalid curve error.
    #[must_use]
    pub fn invalid_curve(reason: impl Into<String>) -> Self {
        Self::InvalidCurve {
            reason: reason.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalyticsError::invalid_curve("rates and cash flows differ in length");
        assert!(err.to_string().contains("differ in length"));
    }
}
