use crate::record::RecordId;

/// Network work the reducer asks for; executed by the session runtime, which
/// reports back through `Msg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Load the full collection once at startup.
    FetchRecords,
    /// Submit a validated URL for analysis.
    SubmitUrl { url: String },
    /// Start analysis for a batch. One request per effect.
    StartRecords { ids: Vec<RecordId> },
    /// Stop analysis for a batch.
    StopRecords { ids: Vec<RecordId> },
    /// Delete a batch; the store shrinks only on confirmation.
    DeleteRecords { ids: Vec<RecordId> },
}
