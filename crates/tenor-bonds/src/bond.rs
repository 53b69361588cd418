//! Fixed-rate bond valuation.
//!
//! [`Bond`] owns an immutable [`BondTerms`] value object, derives the
//! coupon boundary dates, accrued interest, and dirty price at
//! construction, and lazily caches the solved yield and the risk
//! measures built on it. Instances share no state, so independent
//! bonds are safe to use concurrently without synchronization.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use tenor_core::daycounts::{accrued_interest, stub_period_fraction, DayCount};
use tenor_core::types::{Date, Frequency, PriceQuote};
use tenor_math::solvers::{brent, SolverConfig};

use crate::error::{BondError, BondResult};
use crate::schedule;

/// Default yield bump (in percent) for the modified duration finite
/// difference.
pub const DEFAULT_YIELD_BUMP: f64 = 0.01;

/// Immutable terms of a fixed-rate bond.
///
/// Rates and prices are in percent (a 0.625% coupon is `0.625`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondTerms {
    /// Settlement date.
    pub settlement: Date,
    /// Maturity date.
    pub maturity: Date,
    /// Annual coupon rate, percent.
    pub coupon: f64,
    /// Clean price quote, percent of par.
    pub clean_price: PriceQuote,
    /// Coupon payment frequency.
    pub frequency: Frequency,
    /// Day count basis.
    pub basis: DayCount,
    /// Redemption value at maturity, percent of par.
    pub redemption: f64,
}

impl BondTerms {
    /// Creates bond terms with the standard 100% redemption.
    ///
    /// # Errors
    ///
    /// Returns `BondError::InvalidTerms` when settlement is on or after
    /// maturity.
    pub fn new(
        settlement: Date,
        maturity: Date,
        coupon: f64,
        clean_price: impl Into<PriceQuote>,
        frequency: Frequency,
        basis: DayCount,
    ) -> BondResult<Self> {
        Self::with_redemption(settlement, maturity, coupon, clean_price, frequency, basis, 100.0)
    }

    /// Creates bond terms with an explicit redemption value.
    ///
    /// # Errors
    ///
    /// Returns `BondError::InvalidTerms` when settlement is on or after
    /// maturity.
    pub fn with_redemption(
        settlement: Date,
        maturity: Date,
        coupon: f64,
        clean_price: impl Into<PriceQuote>,
        frequency: Frequency,
        basis: DayCount,
        redemption: f64,
    ) -> BondResult<Self> {
        if settlement >= maturity {
            return Err(BondError::invalid_terms(format!(
                "settlement {settlement} must be before maturity {maturity}"
            )));
        }
        Ok(Self {
            settlement,
            maturity,
            coupon,
            clean_price: clean_price.into(),
            frequency,
            basis,
            redemption,
        })
    }
}

/// A fixed-rate bond with cached analytics.
#[derive(Debug)]
pub struct Bond {
    terms: BondTerms,
    couppcd: Date,
    coupncd: Date,
    accrued: f64,
    dirty_price: f64,
    ytm: OnceCell<f64>,
    mac_duration: OnceCell<f64>,
    mod_duration: OnceCell<f64>,
    dv01: OnceCell<f64>,
    convexity: OnceCell<f64>,
    solver: SolverConfig,
}

impl Bond {
    /// Constructs a bond, deriving coupon dates, accrued interest, and
    /// the dirty price eagerly.
    ///
    /// # Errors
    ///
    /// Propagates schedule and day count errors from the terms.
    pub fn new(terms: BondTerms) -> BondResult<Self> {
        let couppcd = schedule::previous_coupon_date(terms.settlement, terms.maturity, terms.frequency)?;
        let coupncd = schedule::next_coupon_date(terms.settlement, terms.maturity, terms.frequency)?;
        let accrued = accrued_interest(
            couppcd,
            coupncd,
            terms.settlement,
            terms.coupon,
            1.0,
            terms.frequency,
            terms.basis,
        )?;
        let dirty_price = terms.clean_price.as_f64() + accrued;
        Ok(Self {
            terms,
            couppcd,
            coupncd,
            accrued,
            dirty_price,
            ytm: OnceCell::new(),
            mac_duration: OnceCell::new(),
            mod_duration: OnceCell::new(),
            dv01: OnceCell::new(),
            convexity: OnceCell::new(),
            solver: SolverConfig::default(),
        })
    }

    /// Constructs a bond with a caller-supplied yield (in percent),
    /// skipping the yield solve.
    ///
    /// # Errors
    ///
    /// Propagates schedule and day count errors from the terms.
    pub fn with_yield(terms: BondTerms, ytm: f64) -> BondResult<Self> {
        let bond = Self::new(terms)?;
        let _ = bond.ytm.set(ytm);
        Ok(bond)
    }

    /// Returns the bond terms.
    #[must_use]
    pub fn terms(&self) -> &BondTerms {
        &self.terms
    }

    /// Previous coupon date (at or before settlement).
    #[must_use]
    pub fn previous_coupon_date(&self) -> Date {
        self.couppcd
    }

    /// Next coupon date (strictly after settlement).
    #[must_use]
    pub fn next_coupon_date(&self) -> Date {
        self.coupncd
    }

    /// Accrued interest at settlement, percent of par.
    #[must_use]
    pub fn accrued_interest(&self) -> f64 {
        self.accrued
    }

    /// Clean price, percent of par.
    #[must_use]
    pub fn clean_price(&self) -> f64 {
        self.terms.clean_price.as_f64()
    }

    /// Dirty price (clean + accrued), percent of par.
    #[must_use]
    pub fn dirty_price(&self) -> f64 {
        self.dirty_price
    }

    /// All remaining coupon dates, descending from maturity.
    pub fn coupon_dates(&self) -> BondResult<Vec<Date>> {
        schedule::coupon_dates(self.terms.settlement, self.terms.maturity, self.terms.frequency)
    }

    /// Yield to maturity in percent, solved from the clean price on
    /// first call and cached.
    ///
    /// # Errors
    ///
    /// Returns a solver error when no yield in [0, 100] percent
    /// reprices the bond.
    pub fn ytm(&self) -> BondResult<f64> {
        self.ytm
            .get_or_try_init(|| {
                yield_to_maturity(
                    self.terms.settlement,
                    self.terms.maturity,
                    self.terms.coupon,
                    self.clean_price(),
                    self.terms.redemption,
                    self.terms.frequency,
                    self.terms.basis,
                    &self.solver,
                )
            })
            .copied()
    }

    /// Discounted cash flows: (period exponent, cash flow in percent,
    /// discount factor) per remaining coupon.
    fn discounted_flows(&self) -> BondResult<Vec<(f64, f64, f64)>> {
        let ytm = self.ytm()?;
        let n = schedule::period_count(self.terms.settlement, self.terms.maturity, self.terms.frequency)?;
        let stub = stub_period_fraction(
            self.couppcd,
            self.coupncd,
            self.terms.settlement,
            self.terms.frequency,
            self.terms.basis,
        );
        let freq = f64::from(self.terms.frequency.periods_per_year());
        let per_period = 1.0 + ytm * 0.01 / freq;

        let mut flows = Vec::with_capacity(n as usize);
        for i in 0..n {
            let period = stub + f64::from(i);
            let mut cf = self.terms.coupon / freq;
            if i == n - 1 {
                cf += self.terms.redemption;
            }
            let df = per_period.powf(period).recip();
            flows.push((period, cf, df));
        }
        Ok(flows)
    }

    /// Macaulay duration in years.
    ///
    /// Triggers a yield solve on first use; cached afterwards.
    pub fn mac_duration(&self) -> BondResult<f64> {
        self.mac_duration
            .get_or_try_init(|| {
                let flows = self.discounted_flows()?;
                let weighted: f64 = flows.iter().map(|(p, cf, df)| cf * df * p).sum();
                let freq = f64::from(self.terms.frequency.periods_per_year());
                Ok(weighted / self.dirty_price / freq)
            })
            .copied()
    }

    /// Modified duration from a symmetric finite difference with the
    /// given yield bump in percent (see [`DEFAULT_YIELD_BUMP`]).
    ///
    /// Cached after the first call; subsequent calls return the cached
    /// value regardless of the bump argument.
    pub fn mod_duration(&self, yield_bump: f64) -> BondResult<f64> {
        self.mod_duration
            .get_or_try_init(|| {
                let ytm = self.ytm()?;
                let up = self.reprice_at(ytm + yield_bump)?;
                let down = self.reprice_at(ytm - yield_bump)?;
                let rel_up = (up - self.dirty_price).abs() / self.dirty_price;
                let rel_down = (down - self.dirty_price).abs() / self.dirty_price;
                Ok((rel_up + rel_down) / 2.0 / (yield_bump * 0.01))
            })
            .copied()
    }

    /// DV01: modified duration scaled by the dirty price in regular
    /// (decimal) units.
    pub fn dv01(&self) -> BondResult<f64> {
        self.dv01
            .get_or_try_init(|| {
                let mod_duration = self.mod_duration(DEFAULT_YIELD_BUMP)?;
                Ok(mod_duration * self.dirty_price * 0.01)
            })
            .copied()
    }

    /// Convexity.
    pub fn convexity(&self) -> BondResult<f64> {
        self.convexity
            .get_or_try_init(|| {
                let ytm = self.ytm()?;
                let flows = self.discounted_flows()?;
                let sum: f64 = flows
                    .iter()
                    .map(|(p, cf, df)| (cf * df * p + cf * df * p * p) / self.dirty_price)
                    .sum();
                let freq = f64::from(self.terms.frequency.periods_per_year());
                let per_period = 1.0 + ytm * 0.01 / freq;
                Ok(sum / (4.0 * per_period * per_period))
            })
            .copied()
    }

    /// Second-order Taylor price change (in percent of par) for a
    /// yield change given in percent.
    pub fn price_change(&self, yield_change: f64) -> BondResult<f64> {
        let dv01 = self.dv01()?;
        let convexity = self.convexity()?;
        let dy = yield_change * 0.01;
        let dirty_reg = self.dirty_price * 0.01;
        let change_reg = -dv01 * dy + dirty_reg * convexity / 2.0 * dy * dy;
        Ok(change_reg * 100.0)
    }

    /// Dirty price at an arbitrary yield (percent), using this bond's
    /// schedule.
    pub fn reprice_at(&self, ytm: f64) -> BondResult<f64> {
        dirty_price(
            self.terms.settlement,
            self.terms.maturity,
            self.terms.coupon,
            ytm,
            self.terms.redemption,
            self.terms.frequency,
            self.terms.basis,
        )
    }
}

/// Dirty price of a bond from its yield, in percent of par.
///
/// Cash flow per period is `coupon / frequency`, with the redemption
/// added to the final period. The discount exponent of period `i` is
/// the first-period stub fraction plus `i`.
///
/// # Errors
///
/// Propagates schedule errors (settlement on/after maturity).
pub fn dirty_price(
    settlement: Date,
    maturity: Date,
    rate: f64,
    ytm: f64,
    redemption: f64,
    frequency: Frequency,
    basis: DayCount,
) -> BondResult<f64> {
    let pcd = schedule::previous_coupon_date(settlement, maturity, frequency)?;
    let ncd = schedule::next_coupon_date(settlement, maturity, frequency)?;
    let n = schedule::period_count(settlement, maturity, frequency)?;
    let stub = stub_period_fraction(pcd, ncd, settlement, frequency, basis);
    Ok(price_within_schedule(stub, n, rate, redemption, frequency, ytm))
}

/// Yield to maturity in percent, solved so that the model dirty price
/// matches `clean_price` plus accrued interest.
///
/// The solve brackets the economically valid yield range [0, 100]
/// percent; a price with no root in that range is an error, not a
/// clamped result.
///
/// # Errors
///
/// Propagates schedule errors and solver failures
/// (`BondError::Solver`).
#[allow(clippy::too_many_arguments)]
pub fn yield_to_maturity(
    settlement: Date,
    maturity: Date,
    rate: f64,
    clean_price: f64,
    redemption: f64,
    frequency: Frequency,
    basis: DayCount,
    config: &SolverConfig,
) -> BondResult<f64> {
    let pcd = schedule::previous_coupon_date(settlement, maturity, frequency)?;
    let ncd = schedule::next_coupon_date(settlement, maturity, frequency)?;
    let n = schedule::period_count(settlement, maturity, frequency)?;
    let stub = stub_period_fraction(pcd, ncd, settlement, frequency, basis);
    let accrued = accrued_interest(pcd, ncd, settlement, rate, 1.0, frequency, basis)?;
    let target = clean_price + accrued;

    let objective = |y: f64| price_within_schedule(stub, n, rate, redemption, frequency, y) - target;
    let result = brent(objective, 0.0, 100.0, config)?;
    Ok(result.root)
}

/// Present value of the remaining cash flows at a yield in percent,
/// given a precomputed stub fraction and period count.
pub(crate) fn price_within_schedule(
    stub: f64,
    periods: u32,
    rate: f64,
    redemption: f64,
    frequency: Frequency,
    ytm: f64,
) -> f64 {
    let freq = f64::from(frequency.periods_per_year());
    let per_period = 1.0 + ytm * 0.01 / freq;
    let mut pv = 0.0;
    for i in 0..periods {
        let mut cf = rate / freq;
        if i == periods - 1 {
            cf += redemption;
        }
        pv += cf / per_period.powf(stub + f64::from(i));
    }
    pv
}
