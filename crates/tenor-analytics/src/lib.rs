//! Curve-based spread analytics: Z-spread over zero-coupon or par
//! curves, and CDS par spreads from risk-free/risky curve pairs.
//!
//! Both engines take annual-grid curves in percent and produce
//! percent-denominated spreads.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod cds;
mod curve;
pub mod error;
pub mod zspread;

pub use cds::Cds;
pub use error::{AnalyticsError, AnalyticsResult};
pub use zspread::{Compounding, ParCurveZSpread, ZeroCurveZSpread};
