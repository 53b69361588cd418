//! # Tenor Core
//!
//! Core types and conventions for the Tenor fixed income analytics
//! library.
//!
//! This crate provides:
//!
//! - **Types**: [`types::Date`], [`types::Frequency`],
//!   [`types::MoneyMarket`], [`types::PriceQuote`]
//! - **Day counts**: the five basis-code conventions and the accrued
//!   interest / stub period calculations built on them
//! - **Errors**: the [`CoreError`] taxonomy shared by the higher crates

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]

pub mod daycounts;
pub mod error;
pub mod types;

pub use daycounts::{accrued_interest, stub_period_fraction, DayCount};
pub use error::{CoreError, CoreResult};
pub use types::{Date, Frequency, MoneyMarket, PriceQuote};
