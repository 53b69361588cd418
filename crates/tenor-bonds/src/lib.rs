//! Bond-level instruments: fixed-rate bond valuation, repo cash
//! flows, and bond futures.
//!
//! [`Bond`] is the valuation core. [`Repo`] and [`BondFuture`] embed a
//! bond and layer financing cash flows on top of it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]

pub mod bond;
pub mod error;
pub mod future;
pub mod repo;
pub mod schedule;

pub use bond::{dirty_price, yield_to_maturity, Bond, BondTerms, DEFAULT_YIELD_BUMP};
pub use error::{BondError, BondResult};
pub use future::BondFuture;
pub use repo::Repo;
