pub mod form;
pub mod log;
pub mod store;

use crate::chart::ChartData;
use crate::state::{DistributionParams, LogEntry, PriceBounds};
use self::log::SessionLog;

/// Shown in both result fields whenever a submission fails for any reason.
pub const INPUT_ERROR_MARKER: &str = "입력 오류";

/// Everything one user session carries between requests.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub distribution: Option<DistributionParams>,
    pub price_bounds: PriceBounds,
    pub log: SessionLog,
}

impl SessionState {
    pub fn new(price_bounds: PriceBounds) -> Self {
        Self {
            distribution: None,
            price_bounds,
            log: SessionLog::new(),
        }
    }

    /// Clears the log and the stored distribution. Price bounds survive.
    pub fn reset(&mut self) {
        self.distribution = None;
        self.log.reset();
    }

    pub fn view(&self, outcome: Option<&SubmissionOutcome>) -> SessionView {
        let (asb_yield, price) = match outcome {
            Some(SubmissionOutcome::Recorded(entry)) => (
                Some(ResultField::Value(entry.asb_yield)),
                Some(ResultField::Value(entry.price)),
            ),
            Some(SubmissionOutcome::InputError) => (
                Some(ResultField::Error(INPUT_ERROR_MARKER)),
                Some(ResultField::Error(INPUT_ERROR_MARKER)),
            ),
            None => (None, None),
        };

        SessionView {
            asb_yield,
            price,
            ac_performance: self.distribution.map(|d| d.mean),
            std_dev: self.distribution.map(|d| d.sigma),
            price_max: self.price_bounds.price_max,
            price_min: self.price_bounds.price_min,
            log: self.log.clone(),
            chart: self.log.chart(),
        }
    }
}

/// Result of one form submission as the user sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubmissionOutcome {
    Recorded(LogEntry),
    InputError,
}

/// A result field: a number on success, the generic marker on failure.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ResultField {
    Value(f64),
    Error(&'static str),
}

/// Page model handed back to the client after every request.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionView {
    pub asb_yield: Option<ResultField>,
    pub price: Option<ResultField>,
    pub ac_performance: Option<f64>,
    pub std_dev: Option<f64>,
    pub price_max: f64,
    pub price_min: f64,
    pub log: SessionLog,
    pub chart: Option<ChartData>,
}
