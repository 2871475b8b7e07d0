use crate::record::{Record, RecordId, RecordStatus};
use crate::view::SortSpec;

/// Per-status totals over the whole store, feeding the stat cards above the
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusSummary {
    pub queued: usize,
    pub running: usize,
    pub done: usize,
    pub error: usize,
    pub stopped: usize,
}

impl StatusSummary {
    pub fn tally(records: &[Record]) -> Self {
        let mut summary = Self::default();
        for record in records {
            match record.status {
                RecordStatus::Queued => summary.queued += 1,
                RecordStatus::Running => summary.running += 1,
                RecordStatus::Done => summary.done += 1,
                RecordStatus::Error => summary.error += 1,
                RecordStatus::Stopped => summary.stopped += 1,
            }
        }
        summary
    }
}

/// One table row: the record plus its selection and busy markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub record: Record,
    pub selected: bool,
    /// A command for this record is on the wire.
    pub busy: bool,
}

/// Everything a host needs to render the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardViewModel {
    pub rows: Vec<RowView>,
    pub page_index: usize,
    pub page_count: usize,
    pub filtered_count: usize,
    pub total_count: usize,
    pub stats: StatusSummary,
    pub sort: Option<SortSpec>,
    pub page_size: usize,
    pub global_filter: String,
    pub selected_ids: Vec<RecordId>,
    pub url_input: String,
    /// Validation error shown inline next to the input.
    pub input_error: Option<String>,
    /// Process-wide error banner.
    pub error: Option<String>,
    pub loading: bool,
}
