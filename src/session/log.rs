use crate::chart::ChartData;
use crate::state::LogEntry;

/// Append-only record of a session's calculations, in submission order.
///
/// Entries are never removed individually; `reset` drops all of them.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(transparent)]
pub struct SessionLog {
    entries: Vec<LogEntry>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Copy of the log ordered by `kpi_criteria` ascending. Stable: equal
    /// thresholds keep their submission order. The stored log is untouched.
    pub fn snapshot_for_chart(&self) -> Vec<LogEntry> {
        let mut sorted = self.entries().to_vec();
        sorted.sort_by(|a, b| a.kpi_criteria.total_cmp(&b.kpi_criteria));
        sorted
    }

    /// Chart series for the current log, or `None` while it is empty.
    pub fn chart(&self) -> Option<ChartData> {
        if self.is_empty() {
            return None;
        }
        Some(ChartData::from_snapshot(&self.snapshot_for_chart()))
    }
}
