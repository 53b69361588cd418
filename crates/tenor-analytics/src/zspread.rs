//! Zero-volatility spread over a zero-coupon or par yield curve.

use std::str::FromStr;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tenor_math::solvers::{brent, SolverConfig};

use crate::curve::bootstrap_discount_factors;
use crate::error::{AnalyticsError, AnalyticsResult};

/// Compounding convention for zero rates recovered from discount
/// factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compounding {
    /// Annual compounding: `DF = (1 + z)^-t`.
    #[default]
    Discrete,
    /// Continuous compounding: `DF = exp(-z t)`.
    Continuous,
}

impl FromStr for Compounding {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discrete" => Ok(Self::Discrete),
            "continuous" => Ok(Self::Continuous),
            other => Err(AnalyticsError::invalid_config(format!(
                "compounding must be 'discrete' or 'continuous', got '{other}'"
            ))),
        }
    }
}

/// Z-spread solver over an observed zero-coupon curve.
///
/// All rates, cash flows, and the face value are in percent;
/// maturities are in years. The solved spread is cached.
#[derive(Debug)]
pub struct ZeroCurveZSpread {
    zero_rates: Vec<f64>,
    cash_flows: Vec<f64>,
    face_value: f64,
    maturities: Vec<f64>,
    z_spread: OnceCell<f64>,
}

impl ZeroCurveZSpread {
    /// Creates a solver from annual-maturity zero rates and the bond
    /// cash flows, with the standard 100% face.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidCurve` for empty or mismatched
    /// inputs.
    pub fn new(zero_rates: Vec<f64>, cash_flows: Vec<f64>) -> AnalyticsResult<Self> {
        let maturities = (1..=zero_rates.len()).map(|i| i as f64).collect();
        Self::with_config(zero_rates, cash_flows, 100.0, maturities)
    }

    /// Creates a solver with an explicit face value and maturity grid.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidCurve` for empty or mismatched
    /// inputs, or maturities that are not strictly increasing and
    /// positive.
    pub fn with_config(
        zero_rates: Vec<f64>,
        cash_flows: Vec<f64>,
        face_value: f64,
        maturities: Vec<f64>,
    ) -> AnalyticsResult<Self> {
        validate_curve(&zero_rates, &cash_flows, &maturities)?;
        Ok(Self {
            zero_rates,
            cash_flows,
            face_value,
            maturities,
            z_spread: OnceCell::new(),
        })
    }

    /// The zero rates in percent.
    #[must_use]
    pub fn zero_rates(&self) -> &[f64] {
        &self.zero_rates
    }

    /// Z-spread in percent: the parallel shift of the zero curve under
    /// which the discounted cash flows equal the face value.
    ///
    /// # Errors
    ///
    /// Returns a solver error when no spread in [0, 100] percent
    /// reprices the cash flows at face.
    pub fn z_spread(&self) -> AnalyticsResult<f64> {
        self.z_spread
            .get_or_try_init(|| {
                let face = self.face_value * 0.01;
                let objective = |spread: f64| self.discounted_total(spread) - face;
                let result = brent(objective, 0.0, 1.0, &SolverConfig::default())?;
                Ok(result.root * 100.0)
            })
            .copied()
    }

    /// Sum of cash flows discounted at zero rate plus spread, all in
    /// regular units.
    fn discounted_total(&self, spread: f64) -> f64 {
        self.zero_rates
            .iter()
            .zip(&self.cash_flows)
            .zip(&self.maturities)
            .map(|((rate, cf), t)| cf * 0.01 / (1.0 + rate * 0.01 + spread).powf(*t))
            .sum()
    }
}

/// Z-spread solver over a par yield curve.
///
/// Par rates are bootstrapped to discount factors, converted to zero
/// rates under the chosen [`Compounding`], and handed to the
/// zero-curve solver.
#[derive(Debug)]
pub struct ParCurveZSpread {
    par_rates: Vec<f64>,
    cash_flows: Vec<f64>,
    face_value: f64,
    compounding: Compounding,
    maturities: Vec<f64>,
    z_spread: OnceCell<f64>,
}

impl ParCurveZSpread {
    /// Creates a solver from annual-maturity par rates and the bond
    /// cash flows, with the standard 100% face and discrete
    /// compounding.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidCurve` for empty or mismatched
    /// inputs.
    pub fn new(par_rates: Vec<f64>, cash_flows: Vec<f64>) -> AnalyticsResult<Self> {
        let maturities = (1..=par_rates.len()).map(|i| i as f64).collect();
        Self::with_config(par_rates, cash_flows, 100.0, Compounding::Discrete, maturities)
    }

    /// Creates a solver with an explicit face value, compounding
    /// convention, and maturity grid.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidCurve` for empty or mismatched
    /// inputs, or maturities that are not strictly increasing and
    /// positive.
    pub fn with_config(
        par_rates: Vec<f64>,
        cash_flows: Vec<f64>,
        face_value: f64,
        compounding: Compounding,
        maturities: Vec<f64>,
    ) -> AnalyticsResult<Self> {
        validate_curve(&par_rates, &cash_flows, &maturities)?;
        Ok(Self {
            par_rates,
            cash_flows,
            face_value,
            compounding,
            maturities,
            z_spread: OnceCell::new(),
        })
    }

    /// Zero rates (percent) bootstrapped from the par curve under this
    /// solver's compounding convention.
    #[must_use]
    pub fn bootstrapped_zero_rates(&self) -> Vec<f64> {
        let face = self.face_value * 0.01;
        let rates_reg: Vec<f64> = self.par_rates.iter().map(|r| r * 0.01).collect();
        let factors = bootstrap_discount_factors(face, &rates_reg);
        factors
            .iter()
            .zip(&self.maturities)
            .map(|(df, t)| match self.compounding {
                Compounding::Discrete => (df.recip().powf(t.recip()) - 1.0) * 100.0,
                Compounding::Continuous => -df.ln() / t * 100.0,
            })
            .collect()
    }

    /// Z-spread in percent over the bootstrapped zero curve.
    ///
    /// # Errors
    ///
    /// Returns a solver error when no spread in [0, 100] percent
    /// reprices the cash flows at face.
    pub fn z_spread(&self) -> AnalyticsResult<f64> {
        self.z_spread
            .get_or_try_init(|| {
                let zero = ZeroCurveZSpread::with_config(
                    self.bootstrapped_zero_rates(),
                    self.cash_flows.clone(),
                    self.face_value,
                    self.maturities.clone(),
                )?;
                zero.z_spread()
            })
            .copied()
    }
}

fn validate_curve(rates: &[f64], cash_flows: &[f64], maturities: &[f64]) -> AnalyticsResult<()> {
    if rates.is_empty() {
        return Err(AnalyticsError::invalid_curve("curve is empty"));
    }
    if rates.len() != cash_flows.len() {
        return Err(AnalyticsError::invalid_curve(format!(
            "{} rates but {} cash flows",
            rates.len(),
            cash_flows.len()
        )));
    }
    if maturities.len() != rates.len() {
        return Err(AnalyticsError::invalid_curve(format!(
            "{} rates but {} maturities",
            rates.len(),
            maturities.len()
        )));
    }
    let increasing = maturities[0] > 0.0 && maturities.windows(2).all(|pair| pair[0] < pair[1]);
    if !increasing {
        return Err(AnalyticsError::invalid_curve(
            "maturities must be positive and strictly increasing",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn five_year_cash_flows() -> Vec<f64> {
        vec![3.0, 3.0, 3.0, 3.0, 103.0]
    }

    #[test]
    fn test_zero_curve_spread() {
        let zero = ZeroCurveZSpread::new(
            vec![1.0, 1.5038, 1.8085, 2.0652, 2.2199],
            five_year_cash_flows(),
        )
        .unwrap();
        assert_relative_eq!(zero.z_spread().unwrap(), 0.8071473, epsilon = 1e-4);
    }

    #[test]
    fn test_par_curve_spread_matches_zero_curve() {
        let par = ParCurveZSpread::new(
            vec![1.00, 1.50, 1.80, 2.05, 2.20],
            five_year_cash_flows(),
        )
        .unwrap();
        assert_relative_eq!(par.z_spread().unwrap(), 0.8071643, epsilon = 1e-4);
    }

    #[test]
    fn test_ten_year_par_curve_spread() {
        let par_rates = vec![2.67, 2.80, 2.92, 3.03, 3.13, 3.22, 3.29, 3.35, 3.40, 3.44];
        let mut cash_flows = vec![4.0; 10];
        cash_flows[9] = 104.0;
        let par = ParCurveZSpread::new(par_rates, cash_flows).unwrap();
        assert!((par.z_spread().unwrap() - 0.566).abs() < 1e-3);
    }

    #[test]
    fn test_bootstrapped_zero_rates_discrete() {
        // The discrete bootstrap of the 5y par curve recovers the
        // quoted zero curve
        let par = ParCurveZSpread::new(
            vec![1.00, 1.50, 1.80, 2.05, 2.20],
            five_year_cash_flows(),
        )
        .unwrap();
        let zero_rates = par.bootstrapped_zero_rates();
        let expected = [1.0, 1.5038, 1.8085, 2.0652, 2.2199];
        for (actual, expected) in zero_rates.iter().zip(expected) {
            assert_relative_eq!(*actual, expected, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_continuous_zero_rates_reproduce_discount_factors() {
        let maturities: Vec<f64> = (1..=5).map(f64::from).collect();
        let par = ParCurveZSpread::with_config(
            vec![1.00, 1.50, 1.80, 2.05, 2.20],
            five_year_cash_flows(),
            100.0,
            Compounding::Continuous,
            maturities.clone(),
        )
        .unwrap();
        let discrete = ParCurveZSpread::new(
            vec![1.00, 1.50, 1.80, 2.05, 2.20],
            five_year_cash_flows(),
        )
        .unwrap();

        // Both conventions describe the same discount factors
        let continuous_dfs: Vec<f64> = par
            .bootstrapped_zero_rates()
            .iter()
            .zip(&maturities)
            .map(|(z, t)| (-z * 0.01 * t).exp())
            .collect();
        let discrete_dfs: Vec<f64> = discrete
            .bootstrapped_zero_rates()
            .iter()
            .zip(&maturities)
            .map(|(z, t)| (1.0 + z * 0.01).powf(-t))
            .collect();
        for (c, d) in continuous_dfs.iter().zip(&discrete_dfs) {
            assert_relative_eq!(*c, *d, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_known_spread_round_trip() {
        // Price the cash flows at a 40bp spread, then solve it back
        let zero_rates: Vec<f64> = vec![1.0, 1.5038, 1.8085, 2.0652, 2.2199];
        let cash_flows = five_year_cash_flows();
        let spread = 0.004;
        let price: f64 = zero_rates
            .iter()
            .zip(&cash_flows)
            .enumerate()
            .map(|(i, (z, cf))| cf / (1.0 + z * 0.01 + spread).powi(i as i32 + 1))
            .sum();

        let maturities = (1..=5).map(f64::from).collect();
        let zero =
            ZeroCurveZSpread::with_config(zero_rates, cash_flows, price, maturities).unwrap();
        assert_relative_eq!(zero.z_spread().unwrap(), 0.4, epsilon = 1e-7);
    }

    #[test]
    fn test_compounding_from_str() {
        assert_eq!("discrete".parse::<Compounding>().unwrap(), Compounding::Discrete);
        assert_eq!("Continuous".parse::<Compounding>().unwrap(), Compounding::Continuous);
        assert!(matches!(
            "quarterly".parse::<Compounding>(),
            Err(AnalyticsError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let result = ZeroCurveZSpread::new(vec![1.0, 2.0], vec![3.0, 3.0, 103.0]);
        assert!(matches!(result, Err(AnalyticsError::InvalidCurve { .. })));
    }

    #[test]
    fn test_rejects_unordered_maturities() {
        let result = ZeroCurveZSpread::with_config(
            vec![1.0, 2.0],
            vec![3.0, 103.0],
            100.0,
            vec![2.0, 1.0],
        );
        assert!(matches!(result, Err(AnalyticsError::InvalidCurve { .. })));
    }
}
