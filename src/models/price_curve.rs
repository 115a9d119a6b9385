use crate::errors::{CalcError, CalcResult};
use crate::models::round_to;

/// KPI value at or below which the lower price bound applies.
pub const KPI_FLOOR: f64 = 80.0;
/// KPI value at or above which the upper price bound applies.
pub const KPI_CEIL: f64 = 100.0;

const PRICE_DECIMALS: i32 = 2;

/// Piecewise-linear sale price over the KPI value (criteria / 10).
///
///   kpi >= 100        -> price_max
///   kpi <= 80         -> price_min
///   otherwise         -> price_min + (kpi - 80) * (price_max - price_min) / 20
///
/// Only the interpolated branch is rounded (2 decimals); the bounds are
/// returned exactly as configured. Bounds are not required to be ordered.
pub fn compute_price(kpi_value: f64, price_max: f64, price_min: f64) -> CalcResult<f64> {
    if !kpi_value.is_finite() || !price_max.is_finite() || !price_min.is_finite() {
        return Err(CalcError::InvalidParameter(format!(
            "non-finite input: kpi_value={kpi_value} price_max={price_max} price_min={price_min}"
        )));
    }

    if kpi_value >= KPI_CEIL {
        return Ok(price_max);
    }
    if kpi_value <= KPI_FLOOR {
        return Ok(price_min);
    }

    let slope = (price_max - price_min) / (KPI_CEIL - KPI_FLOOR);
    let price = round_to(price_min + (kpi_value - KPI_FLOOR) * slope, PRICE_DECIMALS);
    if !price.is_finite() {
        return Err(CalcError::InvalidParameter(format!(
            "price overflow: kpi_value={kpi_value} price_max={price_max} price_min={price_min}"
        )));
    }
    Ok(price)
}
