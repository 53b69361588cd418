//! Bisection root-finding.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Bisection root-finding.
///
/// Linear convergence but unconditionally reliable on a valid bracket.
/// Used as a fallback when Brent's interpolation steps are not wanted.
///
/// Requires: `f(a) * f(b) < 0` (opposite signs at endpoints).
///
/// # Errors
///
/// `MathError::InvalidBracket` when the endpoints do not straddle a
/// root; `MathError::ConvergenceFailed` when the iteration cap is
/// reached.
pub fn bisection<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut lo = a;
    let mut hi = b;
    let f_lo = f(lo);
    let f_hi = f(hi);

    if f_lo * f_hi > 0.0 {
        return Err(MathError::InvalidBracket {
            a,
            b,
            fa: f_lo,
            fb: f_hi,
        });
    }

    // Orient so that f(lo) < 0 <= f(hi)
    if f_lo > 0.0 {
        std::mem::swap(&mut lo, &mut hi);
    }

    let mut mid = (lo + hi) / 2.0;
    for iteration in 0..config.max_iterations {
        mid = (lo + hi) / 2.0;
        let f_mid = f(mid);

        if f_mid.abs() < config.tolerance || (hi - lo).abs() / 2.0 < config.tolerance {
            return Ok(SolverResult {
                root: mid,
                iterations: iteration,
                residual: f_mid,
            });
        }

        if f_mid < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Err(MathError::convergence_failed(
        config.max_iterations,
        f(mid).abs(),
    ))
}
