//! Bond futures: cash-and-carry fair value, net basis, and implied
//! repo rate for a deliverable bond.

use once_cell::sync::OnceCell;

use tenor_core::daycounts::{accrued_interest, DayCount};
use tenor_core::types::{Date, Frequency, MoneyMarket, PriceQuote};

use crate::bond::{Bond, BondTerms};
use crate::error::{BondError, BondResult};

/// A bond future position on a deliverable bond financed in repo until
/// the delivery date.
///
/// Prices and rates are in percent; the conversion factor is a plain
/// ratio.
#[derive(Debug)]
pub struct BondFuture {
    bond: Bond,
    repo_period: i64,
    repo_rate: f64,
    futures_price: f64,
    conversion_factor: f64,
    market: MoneyMarket,
    forward_price: OnceCell<f64>,
    full_future_value: OnceCell<f64>,
}

impl BondFuture {
    /// Creates a bond future from the deliverable bond terms, the repo
    /// financing terms, the quoted futures price, and the conversion
    /// factor.
    ///
    /// # Errors
    ///
    /// Returns `BondError::InvalidTerms` for a non-positive repo
    /// period or a delivery date on or after maturity, and propagates
    /// errors from the bond terms.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settlement: Date,
        maturity: Date,
        coupon: f64,
        clean_price: impl Into<PriceQuote>,
        frequency: Frequency,
        basis: DayCount,
        repo_period: i64,
        repo_rate: f64,
        futures_price: f64,
        conversion_factor: f64,
        market: MoneyMarket,
    ) -> BondResult<Self> {
        if repo_period <= 0 {
            return Err(BondError::invalid_terms(format!(
                "repo period must be positive, got {repo_period} days"
            )));
        }
        if settlement.add_days(repo_period) >= maturity {
            return Err(BondError::invalid_terms(format!(
                "delivery date {} is not before maturity {maturity}",
                settlement.add_days(repo_period)
            )));
        }
        let terms = BondTerms::new(settlement, maturity, coupon, clean_price, frequency, basis)?;
        Ok(Self {
            bond: Bond::new(terms)?,
            repo_period,
            repo_rate,
            futures_price,
            conversion_factor,
            market,
            forward_price: OnceCell::new(),
            full_future_value: OnceCell::new(),
        })
    }

    /// The deliverable bond.
    #[must_use]
    pub fn bond(&self) -> &Bond {
        &self.bond
    }

    /// Delivery date (settlement plus the repo period).
    #[must_use]
    pub fn delivery_date(&self) -> Date {
        self.bond.terms().settlement.add_days(self.repo_period)
    }

    /// Forward dirty price of the bond: the dirty price carried at the
    /// repo rate to delivery, in percent.
    #[must_use]
    pub fn forward_price(&self) -> f64 {
        *self.forward_price.get_or_init(|| {
            let days_in_year = f64::from(self.market.days_in_year());
            let carry = 1.0 + self.repo_rate * 0.01 * self.repo_period as f64 / days_in_year;
            self.bond.dirty_price() * carry
        })
    }

    /// Full futures value in percent: the invoice price
    /// (futures price times conversion factor) plus accrued interest
    /// at delivery plus coupons paid before delivery reinvested at the
    /// repo rate.
    pub fn full_future_value(&self) -> BondResult<f64> {
        self.full_future_value
            .get_or_try_init(|| {
                let terms = self.bond.terms();
                let delivery = self.delivery_date();
                let days_in_year = f64::from(self.market.days_in_year());
                let repo_rate = self.repo_rate * 0.01;
                let coupon_per_period =
                    terms.coupon / f64::from(terms.frequency.periods_per_year());

                // Coupons inside (settlement, delivery], reinvested to delivery
                let dates = self.bond.coupon_dates()?;
                let mut coupon_value = 0.0;
                let mut last_paid: Option<usize> = None;
                for (i, coupon_date) in dates.iter().enumerate() {
                    if *coupon_date <= delivery && *coupon_date > terms.settlement {
                        let reinvest_days = coupon_date.days_between(&delivery) as f64;
                        coupon_value += coupon_per_period
                            * (1.0 + repo_rate * reinvest_days / days_in_year);
                        last_paid.get_or_insert(i);
                    }
                }

                // Accrued at delivery, from the coupon period that
                // brackets the delivery date
                let accrued = match last_paid {
                    None => accrued_interest(
                        self.bond.previous_coupon_date(),
                        self.bond.next_coupon_date(),
                        delivery,
                        terms.coupon,
                        1.0,
                        terms.frequency,
                        terms.basis,
                    )?,
                    Some(i) => {
                        // dates are descending; i > 0 since delivery
                        // is before maturity
                        accrued_interest(
                            dates[i],
                            dates[i - 1],
                            delivery,
                            terms.coupon,
                            1.0,
                            terms.frequency,
                            terms.basis,
                        )?
                    }
                };

                let invoice = self.futures_price * self.conversion_factor;
                Ok(invoice + accrued + coupon_value)
            })
            .copied()
    }

    /// Net basis in 32nds: forward price minus full futures value,
    /// times 32.
    pub fn net_basis(&self) -> BondResult<f64> {
        Ok((self.forward_price() - self.full_future_value()?) * 32.0)
    }

    /// Repo rate (in percent) at which buying the bond and delivering
    /// it into the future breaks even.
    pub fn implied_repo_rate(&self) -> BondResult<f64> {
        let days_in_year = f64::from(self.market.days_in_year());
        let growth = self.full_future_value()? / self.bond.dirty_price() - 1.0;
        Ok(growth * days_in_year / self.repo_period as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn ust_2375_future(futures_price: f64) -> BondFuture {
        // UST 2.375% May-2027 deliverable, 75-day carry to 2020-09-30
        BondFuture::new(
            date(2020, 7, 17),
            date(2027, 5, 15),
            2.375,
            113.015625,
            Frequency::SemiAnnual,
            DayCount::ActAct,
            75,
            0.14,
            futures_price,
            0.8072,
            MoneyMarket::US,
        )
        .unwrap()
    }

    #[test]
    fn test_accrued_and_forward_price() {
        let future = ust_2375_future(139.4375);
        assert_relative_eq!(future.bond().accrued_interest(), 0.4066, epsilon = 1e-4);
        assert_relative_eq!(future.forward_price(), 113.455, epsilon = 1e-3);
        assert_eq!(future.delivery_date(), date(2020, 9, 30));
    }

    #[test]
    fn test_full_future_value_no_coupon_in_window() {
        let future = ust_2375_future(139.4375);
        // No coupon between 2020-07-17 and 2020-09-30, so the value is
        // invoice + accrued at delivery (138/184 of a half coupon)
        let accrued_at_delivery = 2.375 / 2.0 * 138.0 / 184.0;
        let expected = 139.4375 * 0.8072 + accrued_at_delivery;
        assert_relative_eq!(future.full_future_value().unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_net_basis_and_implied_repo() {
        let future = ust_2375_future(139.4375);
        assert_relative_eq!(future.net_basis().unwrap(), 0.3431, epsilon = 1e-3);
        assert_relative_eq!(future.implied_repo_rate().unwrap(), 0.0946, epsilon = 1e-3);
    }

    #[test]
    fn test_fair_futures_price_recovers_repo_rate() {
        // Price the future exactly at fair value; then the net basis
        // vanishes and the implied repo rate equals the market rate
        let reference = ust_2375_future(139.4375);
        let accrued_at_delivery = tenor_core::accrued_interest(
            date(2020, 5, 15),
            date(2020, 11, 15),
            date(2020, 9, 30),
            2.375,
            1.0,
            Frequency::SemiAnnual,
            DayCount::ActAct,
        )
        .unwrap();
        let fair_price = (reference.forward_price() - accrued_at_delivery) / 0.8072;

        let fair = ust_2375_future(fair_price);
        assert_relative_eq!(fair.net_basis().unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(fair.implied_repo_rate().unwrap(), 0.14, epsilon = 1e-9);
    }

    #[test]
    fn test_coupon_in_carry_window() {
        // Carry across the 2020-11-15 coupon; the coupon is reinvested
        // and accrual restarts from it
        let future = BondFuture::new(
            date(2020, 7, 17),
            date(2027, 5, 15),
            2.375,
            113.015625,
            Frequency::SemiAnnual,
            DayCount::ActAct,
            150,
            0.14,
            139.4375,
            0.8072,
            MoneyMarket::US,
        )
        .unwrap();

        let delivery = date(2020, 12, 14);
        assert_eq!(future.delivery_date(), delivery);

        let coupon = 2.375 / 2.0;
        let reinvested = coupon * (1.0 + 0.0014 * 29.0 / 360.0);
        let accrued = tenor_core::accrued_interest(
            date(2020, 11, 15),
            date(2021, 5, 15),
            delivery,
            2.375,
            1.0,
            Frequency::SemiAnnual,
            DayCount::ActAct,
        )
        .unwrap();
        let expected = 139.4375 * 0.8072 + accrued + reinvested;
        assert_relative_eq!(future.full_future_value().unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_delivery_after_maturity() {
        let result = BondFuture::new(
            date(2027, 5, 1),
            date(2027, 5, 15),
            2.375,
            113.015625,
            Frequency::SemiAnnual,
            DayCount::ActAct,
            30,
            0.14,
            139.4375,
            0.8072,
            MoneyMarket::US,
        );
        assert!(matches!(result, Err(BondError::InvalidTerms { .. })));
    }
}
