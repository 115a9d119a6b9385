use crate::errors::{CalcError, CalcResult};
use crate::models::{kpi_value, round_to};
use statrs::distribution::{ContinuousCDF, Normal};

/// Decimal places kept on a reported yield.
pub const YIELD_DECIMALS: i32 = 6;

/// ASB yield: probability that AC performance exceeds the KPI threshold.
///
/// yield = 1 - Phi(kpi_criteria / 10; mean, sigma)
///
/// Rounded to 6 decimals. `sigma` must be strictly positive; a zero sigma is
/// rejected rather than treated as a step function.
pub fn compute_yield(mean: f64, sigma: f64, kpi_criteria: f64) -> CalcResult<f64> {
    if !mean.is_finite() || !sigma.is_finite() || !kpi_criteria.is_finite() {
        return Err(CalcError::InvalidParameter(format!(
            "non-finite input: mean={mean} sigma={sigma} kpi_criteria={kpi_criteria}"
        )));
    }
    if sigma <= 0.0 {
        return Err(CalcError::InvalidParameter(format!(
            "sigma must be > 0, got {sigma}"
        )));
    }

    let normal = Normal::new(mean, sigma)
        .map_err(|e| CalcError::InvalidParameter(format!("normal({mean}, {sigma}): {e}")))?;

    let threshold = kpi_value(kpi_criteria);
    let p = round_to(1.0 - normal.cdf(threshold), YIELD_DECIMALS);
    if !p.is_finite() {
        return Err(CalcError::InvalidParameter(format!(
            "yield not finite: mean={mean} sigma={sigma} kpi_criteria={kpi_criteria}"
        )));
    }

    Ok(p)
}
