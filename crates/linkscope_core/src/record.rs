use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned identifier of one tracked URL. Never reused.
pub type RecordId = u64;

/// Analysis lifecycle of one record. Transitions are server-driven; the only
/// client-side transitions are the optimistic ones applied by start/stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Running,
    Done,
    Error,
    Stopped,
    /// Anything the server sends outside the known set normalizes here.
    #[default]
    #[serde(other)]
    Queued,
}

impl RecordStatus {
    /// Lowercase wire label, also the canonical cell text for filtering and
    /// sorting (so `done` orders before `queued`).
    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Queued => "queued",
            RecordStatus::Running => "running",
            RecordStatus::Done => "done",
            RecordStatus::Error => "error",
            RecordStatus::Stopped => "stopped",
        }
    }

    /// Eligible for the optimistic `-> running` transition.
    pub fn startable(self) -> bool {
        matches!(
            self,
            RecordStatus::Queued | RecordStatus::Stopped | RecordStatus::Error
        )
    }

    /// Eligible for the optimistic `-> stopped` transition.
    pub fn stoppable(self) -> bool {
        matches!(self, RecordStatus::Running)
    }
}

/// One link the crawler could not reach, with the status code it saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokenLink {
    pub url: String,
    #[serde(alias = "status")]
    pub status_code: u16,
}

/// One tracked URL and its analysis result, as the server reports it.
///
/// Wire names are camelCase. Hostile fields are normalized at this boundary:
/// ids arrive as numbers or numeric strings, `brokenLinks` arrives structured
/// or as a JSON-encoded string (unparseable input degrades to an empty list),
/// and unknown statuses fall back to `queued`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(deserialize_with = "de_record_id")]
    pub id: RecordId,
    pub url: String,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default, rename = "pageTitle", alias = "title")]
    pub title: String,
    #[serde(default)]
    pub html_version: String,
    #[serde(default)]
    pub h1_count: u32,
    #[serde(default)]
    pub h2_count: u32,
    #[serde(default)]
    pub h3_count: u32,
    #[serde(default)]
    pub h4_count: u32,
    #[serde(default)]
    pub h5_count: u32,
    #[serde(default)]
    pub h6_count: u32,
    #[serde(default)]
    pub internal_link_count: u32,
    #[serde(default)]
    pub external_link_count: u32,
    #[serde(default)]
    pub inaccessible_link_count: u32,
    #[serde(default, deserialize_with = "de_broken_links")]
    pub broken_links: Vec<BrokenLink>,
    #[serde(default)]
    pub has_login_form: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record {
    /// Minimal record as the server returns it right after submission.
    pub fn new(id: RecordId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            status: RecordStatus::Queued,
            title: String::new(),
            html_version: String::new(),
            h1_count: 0,
            h2_count: 0,
            h3_count: 0,
            h4_count: 0,
            h5_count: 0,
            h6_count: 0,
            internal_link_count: 0,
            external_link_count: 0,
            inaccessible_link_count: 0,
            broken_links: Vec::new(),
            has_login_form: false,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Field-wise change for an existing record. `None` fields are left alone.
///
/// Local optimistic edits carry no `updated_at` and always apply; patches
/// with a timestamp go through the same staleness check as full records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordPatch {
    pub id: RecordId,
    pub status: Option<RecordStatus>,
    pub title: Option<String>,
    pub html_version: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RecordPatch {
    /// Patch carrying only a status change, the shape optimistic commands use.
    pub fn status(id: RecordId, status: RecordStatus) -> Self {
        Self {
            id,
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Tagged merge input for the store, replacing shape-sniffing merges: either
/// a complete server record or an explicit partial change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordUpdate {
    Full(Record),
    Partial(RecordPatch),
}

impl RecordUpdate {
    pub fn id(&self) -> RecordId {
        match self {
            RecordUpdate::Full(record) => record.id,
            RecordUpdate::Partial(patch) => patch.id,
        }
    }
}

fn de_record_id<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(id) => Ok(id),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn de_broken_links<'de, D>(deserializer: D) -> Result<Vec<BrokenLink>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Links(Vec<BrokenLink>),
        Encoded(String),
        // Catch-all so a malformed value degrades instead of failing the record.
        Other(serde_json::Value),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Links(links) => links,
        Raw::Encoded(text) => serde_json::from_str(&text).unwrap_or_default(),
        Raw::Other(_) => Vec::new(),
    })
}
