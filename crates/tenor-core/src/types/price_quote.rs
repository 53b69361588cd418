//! Price quote parsing for bond markets.
//!
//! Most markets quote clean prices as decimals (e.g. 99.953125). US
//! Treasuries quote in 32nds: `"99-30"` means 99 + 30/32, and a
//! trailing `+` adds another half 32nd (`"100-00+"` = 100 + 0.5/32).

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A clean price quote, stored as an exact decimal percentage of par.
///
/// # Example
///
/// ```rust
/// use tenor_core::types::PriceQuote;
///
/// let quote: PriceQuote = "99-30".parse().unwrap();
/// assert_eq!(quote.as_f64(), 99.9375);
///
/// let plus: PriceQuote = "100-00+".parse().unwrap();
/// assert_eq!(plus.as_f64(), 100.015625);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceQuote(Decimal);

impl PriceQuote {
    /// Creates a price quote from a decimal price.
    #[must_use]
    pub fn new(decimal: Decimal) -> Self {
        Self(decimal)
    }

    /// Creates a price quote from 32nds notation.
    ///
    /// # Arguments
    /// * `handle` - The whole number part (e.g., 99 in 99-30)
    /// * `thirty_seconds` - The 32nds part (0-31)
    /// * `plus` - Whether to add half a 32nd (the "+" notation)
    ///
    /// # Errors
    /// Returns `CoreError::InvalidPrice` if `thirty_seconds` > 31.
    pub fn from_thirty_seconds(handle: u32, thirty_seconds: u32, plus: bool) -> CoreResult<Self> {
        if thirty_seconds > 31 {
            return Err(CoreError::invalid_price(
                format!("{handle}-{thirty_seconds}"),
                format!("32nds value must be 0-31, got {thirty_seconds}"),
            ));
        }

        let mut frac = Decimal::from(thirty_seconds);
        if plus {
            frac += Decimal::new(5, 1);
        }
        Ok(Self(Decimal::from(handle) + frac / Decimal::from(32)))
    }

    /// Returns the exact decimal price.
    #[must_use]
    pub fn decimal(&self) -> Decimal {
        self.0
    }

    /// Returns the price as an `f64` percentage of par.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    /// Formats the price in 32nds notation, e.g. `"99-30"` or `"100-00+"`.
    #[must_use]
    pub fn format_thirty_seconds(&self) -> String {
        let handle = self.0.trunc();
        let frac = self.0 - handle;

        // Count 64ths to detect the half-32nd plus
        let sixty_fourths = (frac * Decimal::from(64))
            .round()
            .to_u32()
            .unwrap_or(0);
        let thirty_seconds = sixty_fourths / 2;
        let has_plus = sixty_fourths % 2 == 1;

        let handle = handle.to_u64().unwrap_or(0);
        if has_plus {
            format!("{handle}-{thirty_seconds:02}+")
        } else {
            format!("{handle}-{thirty_seconds:02}")
        }
    }
}

impl FromStr for PriceQuote {
    type Err = CoreError;

    /// Parses a decimal quote (`"99.953125"`) or a 32nds quote
    /// (`"99-30"`, `"100-00+"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if !trimmed.contains('-') {
            return Decimal::from_str(trimmed)
                .map(PriceQuote)
                .map_err(|e| CoreError::invalid_price(s, e.to_string()));
        }

        let plus = trimmed.ends_with('+');
        let body = trimmed.trim_end_matches('+');

        let parts: Vec<&str> = body.split('-').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(CoreError::invalid_price(s, "expected 'handle-32nds'"));
        }

        let handle: u32 = parts[0]
            .parse()
            .map_err(|_| CoreError::invalid_price(s, "handle is not an integer"))?;
        let thirty_seconds: u32 = parts[1]
            .parse()
            .map_err(|_| CoreError::invalid_price(s, "32nds part is not an integer"))?;

        Self::from_thirty_seconds(handle, thirty_seconds, plus)
    }
}

impl From<Decimal> for PriceQuote {
    fn from(decimal: Decimal) -> Self {
        Self(decimal)
    }
}

impl From<f64> for PriceQuote {
    fn from(value: f64) -> Self {
        Self(Decimal::from_f64_retain(value).unwrap_or(Decimal::ZERO))
    }
}

impl std::fmt::Display for PriceQuote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal() {
        let quote: PriceQuote = "99.953125".parse().unwrap();
        assert_eq!(quote.decimal(), dec!(99.953125));

        let quote: PriceQuote = "100".parse().unwrap();
        assert_eq!(quote.decimal(), dec!(100));
    }

    #[test]
    fn test_parse_thirty_seconds() {
        // 99-30 = 99.9375
        let quote: PriceQuote = "99-30".parse().unwrap();
        assert_eq!(quote.decimal(), dec!(99.9375));

        // 99-16 = 99.50
        let quote: PriceQuote = "99-16".parse().unwrap();
        assert_eq!(quote.decimal(), dec!(99.5));
    }

    #[test]
    fn test_parse_thirty_seconds_plus() {
        // 100-00+ = 100 + 0.5/32 = 100.015625
        let quote: PriceQuote = "100-00+".parse().unwrap();
        assert_eq!(quote.decimal(), dec!(100.015625));

        // 99-16+ = 99.515625
        let quote: PriceQuote = "99-16+".parse().unwrap();
        assert_eq!(quote.decimal(), dec!(99.515625));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("abc".parse::<PriceQuote>().is_err());
        assert!("99-xx".parse::<PriceQuote>().is_err());
        assert!("99-16-08".parse::<PriceQuote>().is_err());
        assert!("99-32".parse::<PriceQuote>().is_err());
    }

    #[test]
    fn test_format_thirty_seconds() {
        let quote: PriceQuote = "99-30".parse().unwrap();
        assert_eq!(quote.format_thirty_seconds(), "99-30");

        let quote: PriceQuote = "100-00+".parse().unwrap();
        assert_eq!(quote.format_thirty_seconds(), "100-00+");

        let quote = PriceQuote::new(dec!(99.5));
        assert_eq!(quote.format_thirty_seconds(), "99-16");
    }

    #[test]
    fn test_from_f64() {
        let quote = PriceQuote::from(99.953125);
        assert_eq!(quote.as_f64(), 99.953125);
    }
}
