use crate::record::{Record, RecordId};
use crate::view::Column;

/// The three batched lifecycle commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Start,
    Stop,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input box.
    InputChanged(String),
    /// User submitted the current URL input for analysis.
    UrlSubmitted,
    /// Initial collection fetch resolved.
    RecordsLoaded(Vec<Record>),
    /// Initial collection fetch failed.
    LoadFailed(String),
    /// Server accepted a submission and returned the created record.
    AddAccepted(Record),
    /// Server rejected a submission.
    AddRejected(String),
    /// User asked to start analysis for a batch of records.
    StartRequested { ids: Vec<RecordId> },
    /// User asked to stop analysis for a batch of records.
    StopRequested { ids: Vec<RecordId> },
    /// User asked to delete a batch of records.
    DeleteRequested { ids: Vec<RecordId> },
    /// A batched command call resolved.
    CommandSucceeded {
        command: CommandKind,
        ids: Vec<RecordId>,
    },
    /// A batched command call failed. Targets are released; optimistic
    /// statuses stay until the stream corrects them.
    CommandFailed {
        command: CommandKind,
        ids: Vec<RecordId>,
        message: String,
    },
    /// One full record pushed by the live update channel.
    StreamRecord(Record),
    /// Row checkbox toggled.
    RowToggled(RecordId),
    /// Header checkbox toggled; applies to the rows on the current page.
    PageToggled,
    /// Global search box edited.
    GlobalFilterChanged(String),
    /// Per-column filter edited; blank text clears that filter.
    ColumnFilterChanged { column: Column, value: String },
    /// Column header clicked; cycles none -> ascending -> descending -> none.
    SortCycled(Column),
    /// Pager moved to the given page (clamped at derivation).
    PageChanged(usize),
    /// Page-size selector changed.
    PageSizeChanged(usize),
    /// Error banner dismissed.
    ErrorDismissed,
}
