//! Dual-axis chart data: KPI criteria on x, ASB yield on the left axis,
//! price on the right axis, a marker at every point.
//!
//! Pure data. Rendering is left to whoever consumes the JSON.

use crate::state::LogEntry;

pub const CHART_TITLE: &str = "KPI 기준 vs ASB 수율/판가";
pub const X_LABEL: &str = "KPI 기준";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Circle,
    Square,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ChartSeries {
    pub label: &'static str,
    pub axis: Axis,
    pub axis_label: &'static str,
    pub color: &'static str,
    pub marker: Marker,
    /// Aligned index-for-index with `ChartData::x`.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ChartData {
    pub title: &'static str,
    pub x_label: &'static str,
    pub x: Vec<f64>,
    pub asb_yield: ChartSeries,
    pub price: ChartSeries,
}

impl ChartData {
    /// Build both curves from an already-ordered snapshot. Order is preserved,
    /// so pass `SessionLog::snapshot_for_chart()` for a monotonic x axis.
    pub fn from_snapshot(snapshot: &[LogEntry]) -> Self {
        let x = snapshot.iter().map(|e| e.kpi_criteria).collect();
        let yields = snapshot.iter().map(|e| e.asb_yield).collect();
        let prices = snapshot.iter().map(|e| e.price).collect();

        Self {
            title: CHART_TITLE,
            x_label: X_LABEL,
            x,
            asb_yield: ChartSeries {
                label: "ASB 수율",
                axis: Axis::Left,
                axis_label: "ASB 수율",
                color: "#2a4d8f",
                marker: Marker::Circle,
                values: yields,
            },
            price: ChartSeries {
                label: "판가",
                axis: Axis::Right,
                axis_label: "판가($)",
                color: "red",
                marker: Marker::Square,
                values: prices,
            },
        }
    }
}
