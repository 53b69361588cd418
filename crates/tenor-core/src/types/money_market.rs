//! Money-market conventions for repo and futures interest accrual.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// Money-market convention determining the day basis for simple interest.
///
/// US repo markets accrue on an actual/360 basis, UK (and most sterling
/// money markets) on actual/365.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MoneyMarket {
    /// United States convention: 360-day year.
    #[default]
    US,
    /// United Kingdom convention: 365-day year.
    UK,
}

impl MoneyMarket {
    /// Returns the day basis used for simple interest accrual.
    #[must_use]
    pub const fn days_in_year(&self) -> u32 {
        match self {
            MoneyMarket::US => 360,
            MoneyMarket::UK => 365,
        }
    }
}

impl FromStr for MoneyMarket {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "US" | "us" => Ok(MoneyMarket::US),
            "UK" | "uk" => Ok(MoneyMarket::UK),
            other => Err(CoreError::config_error(format!(
                "money market must be 'US' or 'UK', got '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for MoneyMarket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoneyMarket::US => write!(f, "US"),
            MoneyMarket::UK => write!(f, "UK"),
        }
    }
}
