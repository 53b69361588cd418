//! Day count conventions for accrued interest and coupon accrual.
//!
//! Conventions are keyed by the Excel-style basis codes used throughout
//! the library:
//!
//! | Code | Convention      |
//! |------|-----------------|
//! | 0    | 30/360 US (NASD)|
//! | 1    | actual/actual   |
//! | 2    | actual/360      |
//! | 3    | actual/365      |
//! | 4    | 30E/360         |
//!
//! Two related quantities are computed here:
//!
//! - [`accrued_interest`]: coupon interest earned between the previous
//!   coupon date and settlement, in percent of par.
//! - [`stub_period_fraction`]: the fraction of the first coupon period
//!   remaining at settlement, used as the fractional discounting
//!   exponent in bond pricing. The weighting rules differ per basis
//!   from the plain accrual fraction, so the two are kept separate.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Date, Frequency};

/// Day count convention, identified by its Excel-style basis code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DayCount {
    /// Basis 0: 30/360 US (NASD), with February end-of-month rules.
    Thirty360US,
    /// Basis 1: actual/actual (US Treasury convention).
    #[default]
    ActAct,
    /// Basis 2: actual/360.
    Act360,
    /// Basis 3: actual/365.
    Act365,
    /// Basis 4: 30E/360 (Eurobond).
    Thirty360E,
}

impl DayCount {
    /// Returns the numeric basis code (0-4).
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            DayCount::Thirty360US => 0,
            DayCount::ActAct => 1,
            DayCount::Act360 => 2,
            DayCount::Act365 => 3,
            DayCount::Thirty360E => 4,
        }
    }

    /// Returns the conventional name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            DayCount::Thirty360US => "30/360 US",
            DayCount::ActAct => "ACT/ACT",
            DayCount::Act360 => "ACT/360",
            DayCount::Act365 => "ACT/365",
            DayCount::Thirty360E => "30E/360",
        }
    }

    /// Counts days between two dates under this convention.
    ///
    /// ACT conventions count raw calendar days. The 30/360 variants
    /// clamp day-of-month to 30; 30/360 US additionally applies the
    /// NASD February end-of-month rules.
    #[must_use]
    pub fn day_count(&self, start: Date, end: Date) -> i64 {
        match self {
            DayCount::Thirty360US => {
                let (y1, m1, mut d1) = (start.year(), start.month(), start.day());
                let (y2, m2, mut d2) = (end.year(), end.month(), end.day());

                // NASD February rules: a date on the last day of February
                // counts as the 30th.
                if start.is_end_of_month() && end.is_end_of_month() && m1 == 2 && m2 == 2 {
                    d2 = 30;
                }
                if start.is_end_of_month() && m1 == 2 {
                    d1 = 30;
                }
                if d2 == 31 && (d1 == 30 || d1 == 31) {
                    d2 = 30;
                }
                if d1 == 31 {
                    d1 = 30;
                }
                360 * i64::from(y2 - y1)
                    + 30 * (i64::from(m2) - i64::from(m1))
                    + (i64::from(d2) - i64::from(d1))
            }
            DayCount::Thirty360E => {
                let d1 = start.day().min(30);
                let d2 = end.day().min(30);
                360 * i64::from(end.year() - start.year())
                    + 30 * (i64::from(end.month()) - i64::from(start.month()))
                    + (i64::from(d2) - i64::from(d1))
            }
            DayCount::ActAct | DayCount::Act360 | DayCount::Act365 => start.days_between(&end),
        }
    }
}

impl TryFrom<u8> for DayCount {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(DayCount::Thirty360US),
            1 => Ok(DayCount::ActAct),
            2 => Ok(DayCount::Act360),
            3 => Ok(DayCount::Act365),
            4 => Ok(DayCount::Thirty360E),
            other => Err(CoreError::InvalidBasis { code: other }),
        }
    }
}

impl std::fmt::Display for DayCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Calculates accrued coupon interest at settlement, in percent of par.
///
/// # Arguments
///
/// * `issue` - Start of the accrual period (previous coupon date)
/// * `first_interest` - End of the accrual period (next coupon date)
/// * `settlement` - Settlement date
/// * `rate` - Annual coupon rate in percent
/// * `par` - Par scaling factor (1.0 for percent-of-par results)
/// * `frequency` - Coupon payment frequency
/// * `basis` - Day count convention
///
/// Basis 2 and 3 scale raw calendar days by the fixed 360- or 365-day
/// year directly; they do not route through the period-fraction path
/// used by the other conventions. The two are not algebraically
/// identical for stub periods.
///
/// # Errors
///
/// Returns `CoreError::InvalidSchedule` if `issue` is after
/// `first_interest`.
pub fn accrued_interest(
    issue: Date,
    first_interest: Date,
    settlement: Date,
    rate: f64,
    par: f64,
    frequency: Frequency,
    basis: DayCount,
) -> CoreResult<f64> {
    if issue > first_interest {
        return Err(CoreError::invalid_schedule(format!(
            "issue date {issue} is later than first interest date {first_interest}"
        )));
    }

    let freq = f64::from(frequency.periods_per_year());
    match basis {
        DayCount::Act360 => {
            return Ok(issue.days_between(&settlement) as f64 / 360.0 * rate * par);
        }
        DayCount::Act365 => {
            return Ok(issue.days_between(&settlement) as f64 / 365.0 * rate * par);
        }
        _ => {}
    }

    let total_days = match basis {
        DayCount::Thirty360US | DayCount::Thirty360E => 360.0 / freq,
        _ => basis.day_count(issue, first_interest) as f64,
    };
    let accrued_days = basis.day_count(issue, settlement) as f64;
    Ok((rate / freq) * (accrued_days / total_days) * par)
}

/// Fraction of the first coupon period remaining at settlement.
///
/// This is the fractional part of the discounting exponent for the
/// next coupon: settlement-to-next-coupon days over period days, with
/// basis-dependent numerator and denominator rules.
#[must_use]
pub fn stub_period_fraction(
    pcd: Date,
    ncd: Date,
    settlement: Date,
    frequency: Frequency,
    basis: DayCount,
) -> f64 {
    let freq = f64::from(frequency.periods_per_year());

    let denom_days = match basis {
        DayCount::ActAct => pcd.days_between(&ncd) as f64,
        DayCount::Thirty360US | DayCount::Act360 | DayCount::Thirty360E => 360.0 / freq,
        DayCount::Act365 => 365.0 / freq,
    };

    let num_days = match basis {
        DayCount::ActAct | DayCount::Act360 | DayCount::Act365 => {
            settlement.days_between(&ncd) as f64
        }
        DayCount::Thirty360US | DayCount::Thirty360E => {
            // 30/360-style count from settlement to next coupon, with both
            // endpoints snapped to 30 when they are month-end.
            let d1 = if settlement.is_end_of_month() {
                30
            } else {
                settlement.day()
            };
            let d2 = if ncd.is_end_of_month() { 30 } else { ncd.day() };
            (360 * i64::from(ncd.year() - settlement.year())
                + 30 * (i64::from(ncd.month()) - i64::from(settlement.month()))
                + (i64::from(d2) - i64::from(d1))) as f64
        }
    };

    num_days / denom_days
}
