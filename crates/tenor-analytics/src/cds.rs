//! Credit default swap par spreads from risk-free and risky par
//! curves.

use once_cell::sync::OnceCell;

use crate::curve::bootstrap_discount_factors;
use crate::error::{AnalyticsError, AnalyticsResult};

/// A CDS pricer over annual risk-free and risky par curves.
///
/// Rates, the face value, and the recovery rate are in percent. The
/// n-th curve point is the par rate of an n-year bond; par spreads are
/// produced for the same annual horizons.
#[derive(Debug)]
pub struct Cds {
    risk_free: Vec<f64>,
    risky: Vec<f64>,
    face_value: f64,
    recovery_rate: f64,
    par_spreads: OnceCell<Vec<f64>>,
}

impl Cds {
    /// Creates a pricer from the two par curves.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidCurve` for empty or mismatched
    /// curves, and `AnalyticsError::InvalidConfig` for a recovery rate
    /// outside [0, 100] percent.
    pub fn new(
        risk_free: Vec<f64>,
        risky: Vec<f64>,
        face_value: f64,
        recovery_rate: f64,
    ) -> AnalyticsResult<Self> {
        if risk_free.is_empty() {
            return Err(AnalyticsError::invalid_curve("curve is empty"));
        }
        if risk_free.len() != risky.len() {
            return Err(AnalyticsError::invalid_curve(format!(
                "{} risk-free rates but {} risky rates",
                risk_free.len(),
                risky.len()
            )));
        }
        if !(0.0..=100.0).contains(&recovery_rate) {
            return Err(AnalyticsError::invalid_config(format!(
                "recovery rate must lie in [0, 100] percent, got {recovery_rate}"
            )));
        }
        Ok(Self {
            risk_free,
            risky,
            face_value,
            recovery_rate,
            par_spreads: OnceCell::new(),
        })
    }

    /// Creates a pricer from a risk-free curve and a bond spread over
    /// it; the risky curve is risk-free plus spread, point by point.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Cds::new`].
    pub fn from_bond_spread(
        risk_free: Vec<f64>,
        spread: Vec<f64>,
        face_value: f64,
        recovery_rate: f64,
    ) -> AnalyticsResult<Self> {
        if risk_free.len() != spread.len() {
            return Err(AnalyticsError::invalid_curve(format!(
                "{} risk-free rates but {} spreads",
                risk_free.len(),
                spread.len()
            )));
        }
        let risky = risk_free.iter().zip(&spread).map(|(r, s)| r + s).collect();
        Self::new(risk_free, risky, face_value, recovery_rate)
    }

    /// Par CDS spread (percent) per annual horizon.
    ///
    /// Both curves are bootstrapped to discount factors. The ratio of
    /// one-period risky to risk-free discount growth gives a
    /// per-period default probability once scaled by the loss given
    /// default, survival probabilities follow as its running product,
    /// and the horizon-k spread balances the protection leg against
    /// the premium leg accumulated up to k.
    #[must_use]
    pub fn par_spreads(&self) -> &[f64] {
        self.par_spreads.get_or_init(|| {
            let face = self.face_value * 0.01;
            let recovery = self.recovery_rate * 0.01;
            let loss_given_default = 1.0 - recovery;

            let rf_reg: Vec<f64> = self.risk_free.iter().map(|r| r * 0.01).collect();
            let risky_reg: Vec<f64> = self.risky.iter().map(|r| r * 0.01).collect();
            let df_risk_free = bootstrap_discount_factors(face, &rf_reg);
            let df_risky = bootstrap_discount_factors(face, &risky_reg);

            let n = df_risk_free.len();
            let mut hazard = Vec::with_capacity(n);
            for i in 0..n {
                let (prev_free, prev_risky) = if i == 0 {
                    (1.0, 1.0)
                } else {
                    (df_risk_free[i - 1], df_risky[i - 1])
                };
                let risky_growth = df_risky[i] / prev_risky;
                let free_growth = df_risk_free[i] / prev_free;
                hazard.push((1.0 - risky_growth / free_growth) / loss_given_default);
            }

            let mut survival = Vec::with_capacity(n);
            let mut running = 1.0;
            for h in &hazard {
                running *= 1.0 - h;
                survival.push(running);
            }

            // Protection and premium leg contributions per period
            let mut protection = Vec::with_capacity(n);
            let mut premium = Vec::with_capacity(n);
            for i in 0..n {
                let prior_survival = if i == 0 { 1.0 } else { survival[i - 1] };
                protection.push(prior_survival * hazard[i] * df_risk_free[i]);
                premium.push(survival[i] * df_risk_free[i]);
            }

            let mut spreads = Vec::with_capacity(n);
            let mut protection_sum = 0.0;
            let mut premium_sum = 0.0;
            for i in 0..n {
                protection_sum += protection[i];
                premium_sum += premium[i];
                let spread =
                    loss_given_default * protection_sum / (protection_sum + premium_sum);
                spreads.push(spread * 100.0);
            }
            spreads
        })
    }
}
