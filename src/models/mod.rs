pub mod asb_yield;
pub mod price_curve;

/// Raw KPI criteria are entered at ten times the scale of the performance
/// distribution. Both the yield threshold and the pricing KPI value divide by this.
pub const KPI_SCALE: f64 = 10.0;

/// Convert user-entered KPI criteria to the distribution/pricing scale.
#[inline]
pub fn kpi_value(kpi_criteria: f64) -> f64 {
    kpi_criteria / KPI_SCALE
}

/// Round to `decimals` places, half away from zero (`f64::round`).
/// Values too large to scale have no fractional digits left and pass through.
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}
