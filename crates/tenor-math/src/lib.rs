//! # Tenor Math
//!
//! Scalar root-finding for the Tenor fixed income analytics library.
//!
//! This crate provides the bounded-iteration solvers used to invert
//! price to yield, find repo break-even yields, and solve Z-spreads.
//! Non-convergence is a recoverable error returned to the caller, never
//! a panic.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod error;
pub mod solvers;

pub use error::{MathError, MathResult};
pub use solvers::{bisection, brent, SolverConfig, SolverResult};
