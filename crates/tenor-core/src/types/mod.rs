//! Core value types shared across the Tenor workspace.

mod date;
mod frequency;
mod money_market;
mod price_quote;

pub use date::Date;
pub use frequency::Frequency;
pub use money_market::MoneyMarket;
pub use price_quote::PriceQuote;
