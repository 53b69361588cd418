//! Repurchase agreement cash flows on a bond collateral leg.

use once_cell::sync::OnceCell;

use tenor_core::daycounts::{accrued_interest, DayCount};
use tenor_core::types::{Date, Frequency, MoneyMarket, PriceQuote};
use tenor_math::solvers::{brent, SolverConfig};

use crate::bond::{self, Bond, BondTerms};
use crate::error::{BondError, BondResult};

/// A repo trade: bond collateral lent against cash for a fixed period
/// at a fixed repo rate.
///
/// Payments are in currency units of the bond face value. The money
/// market convention sets the interest year (360 days US, 365 UK).
#[derive(Debug)]
pub struct Repo {
    bond: Bond,
    face_value: f64,
    repo_period: i64,
    repo_rate: f64,
    market: MoneyMarket,
    start_payment: OnceCell<f64>,
    end_payment: OnceCell<f64>,
}

impl Repo {
    /// Creates a repo from its period length in days.
    ///
    /// `repo_rate` is in percent.
    ///
    /// # Errors
    ///
    /// Returns `BondError::InvalidTerms` for a non-positive period, and
    /// propagates errors from the bond terms.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settlement: Date,
        maturity: Date,
        coupon: f64,
        clean_price: impl Into<PriceQuote>,
        frequency: Frequency,
        basis: DayCount,
        face_value: f64,
        repo_period: i64,
        repo_rate: f64,
        market: MoneyMarket,
    ) -> BondResult<Self> {
        if repo_period <= 0 {
            return Err(BondError::invalid_terms(format!(
                "repo period must be positive, got {repo_period} days"
            )));
        }
        let terms = BondTerms::new(settlement, maturity, coupon, clean_price, frequency, basis)?;
        Ok(Self {
            bond: Bond::new(terms)?,
            face_value,
            repo_period,
            repo_rate,
            market,
            start_payment: OnceCell::new(),
            end_payment: OnceCell::new(),
        })
    }

    /// Creates a repo from its end date instead of a period length.
    ///
    /// # Errors
    ///
    /// Returns `BondError::InvalidTerms` when the end date is not after
    /// settlement, and propagates errors from the bond terms.
    #[allow(clippy::too_many_arguments)]
    pub fn from_end_date(
        settlement: Date,
        maturity: Date,
        coupon: f64,
        clean_price: impl Into<PriceQuote>,
        frequency: Frequency,
        basis: DayCount,
        face_value: f64,
        repo_end_date: Date,
        repo_rate: f64,
        market: MoneyMarket,
    ) -> BondResult<Self> {
        let repo_period = settlement.days_between(&repo_end_date);
        Self::new(
            settlement,
            maturity,
            coupon,
            clean_price,
            frequency,
            basis,
            face_value,
            repo_period,
            repo_rate,
            market,
        )
    }

    /// The collateral bond.
    #[must_use]
    pub fn bond(&self) -> &Bond {
        &self.bond
    }

    /// Repo end date (settlement plus the repo period).
    #[must_use]
    pub fn end_date(&self) -> Date {
        self.bond.terms().settlement.add_days(self.repo_period)
    }

    /// Repo period in days.
    #[must_use]
    pub fn period_days(&self) -> i64 {
        self.repo_period
    }

    /// Repo rate in percent.
    #[must_use]
    pub fn repo_rate(&self) -> f64 {
        self.repo_rate
    }

    /// Cash paid at repo start: face value times the dirty price.
    #[must_use]
    pub fn start_payment(&self) -> f64 {
        *self
            .start_payment
            .get_or_init(|| self.face_value * self.bond.dirty_price() * 0.01)
    }

    /// Cash repaid at repo end: the start payment plus repo interest,
    /// net of any coupons paid during the repo period together with
    /// reinvestment interest on them at the repo rate.
    pub fn end_payment(&self) -> BondResult<f64> {
        self.end_payment
            .get_or_try_init(|| {
                let days_in_year = f64::from(self.market.days_in_year());
                let repo_rate = self.repo_rate * 0.01;
                let start = self.start_payment();
                let mut end = start + start * repo_rate * self.repo_period as f64 / days_in_year;

                let terms = self.bond.terms();
                let end_date = self.end_date();
                let coupon_per_period = self.face_value * terms.coupon * 0.01
                    / f64::from(terms.frequency.periods_per_year());
                for coupon_date in self.bond.coupon_dates()? {
                    if coupon_date <= end_date {
                        let reinvest_days = coupon_date.days_between(&end_date) as f64;
                        end -= coupon_per_period;
                        end -= coupon_per_period * repo_rate * reinvest_days / days_in_year;
                    }
                }
                Ok(end)
            })
            .copied()
    }

    /// Start payment reduced by a margin ratio in percent (a 102%
    /// margin lends 100/102 of the collateral value).
    pub fn purchase_price_with_margin(&self, margin: f64) -> f64 {
        self.start_payment() / margin * 100.0
    }

    /// Start payment reduced by a haircut in percent.
    pub fn purchase_price_with_haircut(&self, haircut: f64) -> f64 {
        self.start_payment() * (1.0 - haircut * 0.01)
    }

    /// Yield (in percent) at which the bond's dirty price equals the
    /// forward dirty price implied by the repo end payment.
    ///
    /// # Errors
    ///
    /// Propagates solver failures when no yield in [0, 100] percent
    /// matches the forward price.
    pub fn break_even_yield(&self) -> BondResult<f64> {
        let terms = self.bond.terms();
        let forward_dirty = self.end_payment()? / self.face_value * 100.0;

        let pcd = self.bond.previous_coupon_date();
        let ncd = self.bond.next_coupon_date();
        let n = crate::schedule::period_count(terms.settlement, terms.maturity, terms.frequency)?;
        let stub = tenor_core::daycounts::stub_period_fraction(
            pcd,
            ncd,
            terms.settlement,
            terms.frequency,
            terms.basis,
        );

        let objective = |y: f64| {
            bond::price_within_schedule(stub, n, terms.coupon, terms.redemption, terms.frequency, y)
                - forward_dirty
        };
        let result = brent(objective, 0.0, 100.0, &SolverConfig::default())?;
        Ok(result.root)
    }

    /// Accrued interest (in currency units) at the repo end date, on
    /// the original coupon boundary dates.
    pub fn forward_accrued_interest(&self) -> BondResult<f64> {
        let terms = self.bond.terms();
        let accrued = accrued_interest(
            self.bond.previous_coupon_date(),
            self.bond.next_coupon_date(),
            self.end_date(),
            terms.coupon,
            1.0,
            terms.frequency,
            terms.basis,
        )?;
        Ok(accrued * 0.01 * self.face_value)
    }

    /// Start payment from a face value and dirty price alone.
    ///
    /// With both a margin and a haircut supplied, the margin takes
    /// precedence and the haircut is ignored with a warning.
    pub fn start_payment_for(
        face_value: f64,
        dirty_price: f64,
        margin: Option<f64>,
        haircut: Option<f64>,
    ) -> f64 {
        let start = face_value * dirty_price * 0.01;
        if margin.is_some() && haircut.is_some() {
            log::warn!("both margin and haircut provided; only margin is used");
        }
        if let Some(margin) = margin {
            return start / margin * 100.0;
        }
        if let Some(haircut) = haircut {
            return start * (1.0 - haircut * 0.01);
        }
        start
    }

    /// End payment from a face value, dirty price, repo rate, and
    /// period alone. Coupons paid during the repo period are not
    /// netted; use [`Repo::end_payment`] for that.
    pub fn end_payment_for(
        face_value: f64,
        dirty_price: f64,
        repo_period: i64,
        repo_rate: f64,
        market: MoneyMarket,
    ) -> f64 {
        let start = Self::start_payment_for(face_value, dirty_price, None, None);
        let days_in_year = f64::from(market.days_in_year());
        start + start * repo_rate * 0.01 * repo_period as f64 / days_in_year
    }
}
