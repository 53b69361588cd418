//! Error types for bond, repo, and bond-future calculations.

use thiserror::Error;

/// A specialized Result type for bond operations.
pub type BondResult<T> = Result<T, BondError>;

/// Errors raised by the valuation engines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BondError {
    /// Error propagated from core types or day count calculations.
    #[error(transparent)]
    Core(#[from] tenor_core::CoreError),

    /// Yield, break-even, or spread solve failed or left its valid range.
    #[error("Solver error: {0}")]
    Solver(#[from] tenor_math::MathError),

    /// Invalid instrument terms.
    #[error("Invalid bond terms: {reason}")]
    InvalidTerms {
        /// Description of what is invalid.
        reason: String,
    },
}

impl BondError {
    /// Creates an invalid terms error.
    #[must_use]
    pub fn invalid_terms(reason: impl Into<String>) -> Self {
        Self::InvalidTerms {
            reason: reason.into(),
        }
    }
}
