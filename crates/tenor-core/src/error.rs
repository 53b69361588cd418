//! Error types for the Tenor core crate.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by core types and day count calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date construction or parsing.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Coupon schedule is malformed (e.g. issue date after first interest date).
    #[error("Invalid schedule: {reason}")]
    InvalidSchedule {
        /// Description of what is wrong with the schedule.
        reason: String,
    },

    /// Price is neither a decimal number nor a parseable 32nds quote.
    #[error("Invalid price quote '{quote}': {reason}")]
    InvalidPrice {
        /// The offending quote string.
        quote: String,
        /// Reason the quote was rejected.
        reason: String,
    },

    /// Coupon frequency is not a divisor of 12.
    #[error("Invalid coupon frequency: {value} (expected 1, 2, 4, or 12)")]
    InvalidFrequency {
        /// The rejected frequency.
        value: u32,
    },

    /// Day count basis code is outside 0-4.
    #[error("Invalid day count basis code: {code} (expected 0-4)")]
    InvalidBasis {
        /// The rejected basis code.
        code: u8,
    },

    /// Configuration error (unrecognized mode, mismatched inputs).
    #[error("Configuration error: {reason}")]
    ConfigError {
        /// Description of the configuration error.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid schedule error.
    #[must_use]
    pub fn invalid_schedule(reason: impl Into<String>) -> Self {
        Self::InvalidSchedule {
            reason: reason.into(),
        }
    }

    /// Creates an invalid price error.
    #[must_use]
    pub fn invalid_price(quote: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPrice {
            quote: quote.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config_error(reason: impl Into<String>) -> Self {
        Self::ConfigError {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_date("2024-02-30 is not a valid date");
        assert!(err.to_string().contains("Invalid date"));

        let err = CoreError::InvalidBasis { code: 7 };
        assert!(err.to_string().contains("basis code: 7"));
    }

    #[test]
    fn test_invalid_price_display() {
        let err = CoreError::invalid_price("99-xx", "32nds part is not a number");
        assert!(err.to_string().contains("99-xx"));
    }
}
