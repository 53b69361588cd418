//! Coupon payment frequency.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Coupon payment frequency.
///
/// Only frequencies whose coupon interval is a whole number of months
/// are supported (1, 2, 4, or 12 payments per year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// One payment per year.
    Annual,
    /// Two payments per year (US Treasury convention).
    SemiAnnual,
    /// Four payments per year.
    Quarterly,
    /// Twelve payments per year.
    Monthly,
}

impl Frequency {
    /// Returns the number of coupon payments per year.
    #[must_use]
    pub const fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
        }
    }

    /// Returns the length of one coupon period in months.
    #[must_use]
    pub const fn months_per_period(&self) -> i32 {
        match self {
            Frequency::Annual => 12,
            Frequency::SemiAnnual => 6,
            Frequency::Quarterly => 3,
            Frequency::Monthly => 1,
        }
    }
}

impl TryFrom<u32> for Frequency {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Frequency::Annual),
            2 => Ok(Frequency::SemiAnnual),
            4 => Ok(Frequency::Quarterly),
            12 => Ok(Frequency::Monthly),
            other => Err(CoreError::InvalidFrequency { value: other }),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.periods_per_year())
    }
}
