use crate::errors::{CalcError, CalcResult};
use crate::models::kpi_value;
use crate::session::{SessionState, SubmissionOutcome};
use crate::state::{DistributionParams, LogEntry, PriceBounds};

/// Raw form fields as posted. Every field is optional at the wire level so
/// that a missing key becomes an input error instead of a rejected request.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct SubmissionForm {
    pub ac_performance: Option<String>,
    pub std_dev: Option<String>,
    pub price_max: Option<String>,
    pub price_min: Option<String>,
    pub kpi_criteria: Option<String>,
}

/// Absent key -> error; blank value -> `None`; otherwise the value must parse as a float.
fn parse_field(name: &str, raw: Option<&str>) -> CalcResult<Option<f64>> {
    match raw.map(str::trim) {
        None => Err(CalcError::Input(format!("{name}: missing form field"))),
        Some("") => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|e| CalcError::Input(format!("{name}: {e}"))),
    }
}

impl SessionState {
    /// Run one submission against this session.
    ///
    /// All five keys must be present. Non-blank distribution and bound values
    /// replace the stored ones, blank values fall back to them. Nothing in the
    /// session changes unless the whole calculation succeeds, and any failure
    /// maps to `InputError`.
    pub fn submit(&mut self, form: &SubmissionForm) -> SubmissionOutcome {
        match self.try_submit(form) {
            Ok(entry) => SubmissionOutcome::Recorded(entry),
            Err(e) => {
                tracing::debug!(error = %e, "submission rejected");
                SubmissionOutcome::InputError
            }
        }
    }

    fn try_submit(&mut self, form: &SubmissionForm) -> CalcResult<LogEntry> {
        let stored = self.distribution;

        let mean = parse_field("ac_performance", form.ac_performance.as_deref())?
            .or(stored.map(|d| d.mean))
            .ok_or_else(|| CalcError::Input("ac_performance not set".into()))?;
        let sigma = parse_field("std_dev", form.std_dev.as_deref())?
            .or(stored.map(|d| d.sigma))
            .ok_or_else(|| CalcError::Input("std_dev not set".into()))?;

        let price_max = parse_field("price_max", form.price_max.as_deref())?
            .unwrap_or(self.price_bounds.price_max);
        let price_min = parse_field("price_min", form.price_min.as_deref())?
            .unwrap_or(self.price_bounds.price_min);

        let kpi_criteria = parse_field("kpi_criteria", form.kpi_criteria.as_deref())?
            .ok_or_else(|| CalcError::Input("kpi_criteria is required".into()))?;

        let distribution = DistributionParams { mean, sigma };
        let price_bounds = PriceBounds { price_max, price_min };

        let asb_yield = distribution.yield_at(kpi_criteria)?;
        let price = price_bounds.price_for(kpi_value(kpi_criteria))?;

        let entry = LogEntry {
            kpi_criteria,
            asb_yield,
            price,
        };

        self.distribution = Some(distribution);
        self.price_bounds = price_bounds;
        self.log.append(entry);

        Ok(entry)
    }
}
