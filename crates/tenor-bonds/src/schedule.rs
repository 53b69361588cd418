//! Coupon schedule derivation.
//!
//! Coupon dates are generated by stepping backward from maturity in
//! whole-month coupon intervals. Period counting iterates rather than
//! dividing a month difference: month-length irregularities make the
//! division unreliable, so stepping continues until the stepped-back
//! date no longer exceeds settlement.
//!
//! End-of-month rule: when maturity falls on the last calendar day of
//! its month, every generated coupon date snaps to the last day of its
//! own month. This keeps 28/29/30/31-day month mismatches consistent
//! (e.g. an Aug-31 maturity pays Feb-28/29, not Feb-31-rolled-back).

use tenor_core::types::{Date, Frequency};

use crate::error::{BondError, BondResult};

/// Number of remaining coupon periods between settlement and maturity.
///
/// # Errors
///
/// Returns `BondError::InvalidTerms` when settlement is on or after
/// maturity.
pub fn period_count(settlement: Date, maturity: Date, frequency: Frequency) -> BondResult<u32> {
    if settlement >= maturity {
        return Err(BondError::invalid_terms(format!(
            "settlement {settlement} must be before maturity {maturity}"
        )));
    }
    let step = frequency.months_per_period();
    let mut n: u32 = 0;
    while maturity.add_months(-step * n as i32)? > settlement {
        n += 1;
    }
    Ok(n)
}

/// Previous coupon date: the latest coupon date at or before settlement.
///
/// When settlement falls exactly on a coupon date, that date is
/// returned.
pub fn previous_coupon_date(
    settlement: Date,
    maturity: Date,
    frequency: Frequency,
) -> BondResult<Date> {
    let n = period_count(settlement, maturity, frequency)?;
    let pcd = maturity.add_months(-frequency.months_per_period() * n as i32)?;
    Ok(snap_to_eom(pcd, maturity))
}

/// Next coupon date: the earliest coupon date strictly after settlement.
pub fn next_coupon_date(
    settlement: Date,
    maturity: Date,
    frequency: Frequency,
) -> BondResult<Date> {
    let n = period_count(settlement, maturity, frequency)?;
    let ncd = maturity.add_months(-frequency.months_per_period() * (n as i32 - 1))?;
    Ok(snap_to_eom(ncd, maturity))
}

/// All remaining coupon dates, in descending order from maturity down
/// to (and not including) any date at or before settlement.
pub fn coupon_dates(
    settlement: Date,
    maturity: Date,
    frequency: Frequency,
) -> BondResult<Vec<Date>> {
    let n = period_count(settlement, maturity, frequency)?;
    let step = frequency.months_per_period();
    let mut dates = Vec::with_capacity(n as usize);
    for i in 0..n {
        let d = maturity.add_months(-step * i as i32)?;
        dates.push(snap_to_eom(d, maturity));
    }
    Ok(dates)
}

/// Snaps a stepped coupon date to its month end when maturity itself is
/// a month-end date.
fn snap_to_eom(date: Date, maturity: Date) -> Date {
    if maturity.is_end_of_month() {
        date.end_of_month()
    } else {
        date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_previous_and_next_coupon_date() {
        let settlement = date(2020, 7, 15);
        let maturity = date(2030, 5, 15);

        let pcd = previous_coupon_date(settlement, maturity, Frequency::SemiAnnual).unwrap();
        let ncd = next_coupon_date(settlement, maturity, Frequency::SemiAnnual).unwrap();
        assert_eq!(pcd, date(2020, 5, 15));
        assert_eq!(ncd, date(2020, 11, 15));
    }

    #[test]
    fn test_settlement_on_coupon_date() {
        let settlement = date(2020, 11, 15);
        let maturity = date(2030, 5, 15);

        let pcd = previous_coupon_date(settlement, maturity, Frequency::SemiAnnual).unwrap();
        let ncd = next_coupon_date(settlement, maturity, Frequency::SemiAnnual).unwrap();
        assert_eq!(pcd, settlement);
        assert_eq!(ncd, date(2021, 5, 15));
    }

    #[test]
    fn test_end_of_month_snap() {
        // Jun-30 maturity: every coupon date snaps to month end
        let settlement = date(2020, 7, 15);
        let maturity = date(2025, 6, 30);

        let pcd = previous_coupon_date(settlement, maturity, Frequency::SemiAnnual).unwrap();
        let ncd = next_coupon_date(settlement, maturity, Frequency::SemiAnnual).unwrap();
        assert_eq!(pcd, date(2020, 6, 30));
        assert_eq!(ncd, date(2020, 12, 31));
    }

    #[test]
    fn test_end_of_month_snap_february() {
        // Aug-31 maturity pays on the last day of February
        let settlement = date(2024, 1, 15);
        let maturity = date(2026, 8, 31);

        let ncd = next_coupon_date(settlement, maturity, Frequency::SemiAnnual).unwrap();
        assert_eq!(ncd, date(2024, 2, 29));
    }

    #[test]
    fn test_coupon_dates_descending() {
        let settlement = date(2020, 7, 16);
        let maturity = date(2021, 5, 15);

        let dates = coupon_dates(settlement, maturity, Frequency::SemiAnnual).unwrap();
        assert_eq!(dates, vec![date(2021, 5, 15), date(2020, 11, 15)]);
    }

    #[test]
    fn test_quarterly_schedule() {
        let settlement = date(2020, 7, 15);
        let maturity = date(2021, 1, 7);

        let dates = coupon_dates(settlement, maturity, Frequency::Quarterly).unwrap();
        assert_eq!(dates, vec![date(2021, 1, 7), date(2020, 10, 7)]);
    }

    #[test]
    fn test_period_count() {
        let n = period_count(date(2020, 7, 15), date(2030, 5, 15), Frequency::SemiAnnual).unwrap();
        assert_eq!(n, 20);

        assert!(period_count(date(2030, 5, 15), date(2030, 5, 15), Frequency::SemiAnnual).is_err());
        assert!(period_count(date(2031, 1, 1), date(2030, 5, 15), Frequency::SemiAnnual).is_err());
    }

    proptest! {
        #[test]
        fn prop_pcd_le_settlement_lt_ncd(
            settle_offset in 0i64..3650,
            maturity_months in 1i32..360,
            freq in prop::sample::select(vec![1u32, 2, 4, 12]),
        ) {
            let base = date(2015, 1, 1);
            let settlement = base.add_days(settle_offset);
            let maturity = base.add_months(12 * 30).unwrap().add_months(maturity_months).unwrap();
            let frequency = Frequency::try_from(freq).unwrap();

            let pcd = previous_coupon_date(settlement, maturity, frequency).unwrap();
            let ncd = next_coupon_date(settlement, maturity, frequency).unwrap();

            prop_assert!(pcd <= settlement);
            prop_assert!(settlement < ncd);

            // The gap is exactly one coupon interval in month arithmetic
            // (day-of-month may differ through end-of-month snapping)
            let month_gap = (ncd.year() * 12 + ncd.month() as i32)
                - (pcd.year() * 12 + pcd.month() as i32);
            prop_assert_eq!(month_gap, frequency.months_per_period());
        }
    }
}
