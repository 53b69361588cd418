//! Scalar root-finding.
//!
//! Every iterative solve in the workspace (yield from price, repo
//! break-even yield, Z-spread) goes through this module:
//!
//! - [`brent`]: robust bracketing method combining bisection, secant,
//!   and inverse quadratic interpolation. The default choice.
//! - [`bisection`]: simple bracketing fallback with linear convergence.
//!
//! Both require a sign change on the supplied interval and return a
//! structured error when the bracket is invalid or the iteration cap is
//! reached. Callers pass a bracket equal to the economically valid
//! range of the quantity being solved (e.g. 0-100 percent for bond
//! yields), so an out-of-range root surfaces as `InvalidBracket` rather
//! than a silently clamped value.

mod bisection;
mod brent;

pub use bisection::bisection;
pub use brent::brent;

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Tolerance for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a successful root-finding run.
#[derive(Debug, Clone, Copy)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Residual `f(root)` at termination.
    pub residual: f64,
}
