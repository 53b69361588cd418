//! Par curve bootstrap shared by the spread engines.

/// Bootstraps discount factors from annual par rates.
///
/// A par bond pays its coupon each year and redeems at face, so each
/// discount factor follows from the ones before it:
/// `DF_1 = F / (F + c_1)` and
/// `DF_i = (F - c_i * sum(DF_1..DF_{i-1})) / (F + c_i)`.
///
/// Rates and face are in regular (decimal) units.
pub(crate) fn bootstrap_discount_factors(face: f64, par_rates: &[f64]) -> Vec<f64> {
    let mut factors: Vec<f64> = Vec::with_capacity(par_rates.len());
    let mut running_sum = 0.0;
    for rate in par_rates {
        let df = (face - rate * running_sum) / (face + rate);
        running_sum += df;
        factors.push(df);
    }
    factors
}
