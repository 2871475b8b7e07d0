use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::record::{Record, RecordId, RecordPatch, RecordUpdate};

/// What an `upsert` did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// First time this id was seen; the record now heads insertion order.
    Inserted,
    /// An existing record changed.
    Updated,
    /// The merge carried nothing new (duplicate or stale delivery).
    Unchanged,
    /// Partial update for an id the store has never seen.
    Ignored,
}

impl UpsertOutcome {
    pub fn changed(self) -> bool {
        matches!(self, UpsertOutcome::Inserted | UpsertOutcome::Updated)
    }
}

/// Canonical, deduplicated collection of analysis records.
///
/// Insertion order is explicit and head-first: the newest record sits at
/// index 0, which doubles as the default display order and the tie break for
/// every derived sort. Filtering and pagination never touch this collection;
/// records leave only through `remove`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: HashMap<RecordId, Record>,
    order: Vec<RecordId>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an unseen record at the head, or merges into the existing one.
    ///
    /// Merges with an `updated_at` not newer than the stored one are dropped,
    /// which makes duplicate and out-of-order deliveries no-ops. Partial
    /// patches replace only their present fields; patches without a timestamp
    /// (local optimistic edits) always apply.
    pub fn upsert(&mut self, update: RecordUpdate) -> UpsertOutcome {
        match update {
            RecordUpdate::Full(record) => self.merge_full(record),
            RecordUpdate::Partial(patch) => self.merge_patch(patch),
        }
    }

    fn merge_full(&mut self, incoming: Record) -> UpsertOutcome {
        let Some(existing) = self.records.get_mut(&incoming.id) else {
            self.order.insert(0, incoming.id);
            self.records.insert(incoming.id, incoming);
            return UpsertOutcome::Inserted;
        };
        if is_stale(incoming.updated_at, existing.updated_at) {
            return UpsertOutcome::Unchanged;
        }
        if *existing == incoming {
            return UpsertOutcome::Unchanged;
        }
        *existing = incoming;
        UpsertOutcome::Updated
    }

    fn merge_patch(&mut self, patch: RecordPatch) -> UpsertOutcome {
        let Some(existing) = self.records.get_mut(&patch.id) else {
            return UpsertOutcome::Ignored;
        };
        if patch.updated_at.is_some() && is_stale(patch.updated_at, existing.updated_at) {
            return UpsertOutcome::Unchanged;
        }

        let mut changed = false;
        if let Some(status) = patch.status {
            if existing.status != status {
                existing.status = status;
                changed = true;
            }
        }
        if let Some(title) = patch.title {
            if existing.title != title {
                existing.title = title;
                changed = true;
            }
        }
        if let Some(html_version) = patch.html_version {
            if existing.html_version != html_version {
                existing.html_version = html_version;
                changed = true;
            }
        }
        if let Some(updated_at) = patch.updated_at {
            if existing.updated_at != Some(updated_at) {
                existing.updated_at = Some(updated_at);
                changed = true;
            }
        }

        if changed {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Unchanged
        }
    }

    /// Removes the given ids. Unknown ids are no-ops, so a confirmed delete
    /// can be replayed safely.
    pub fn remove(&mut self, ids: &[RecordId]) -> usize {
        let mut removed = 0;
        for id in ids {
            if self.records.remove(id).is_some() {
                removed += 1;
            }
        }
        if removed > 0 {
            self.order.retain(|id| self.records.contains_key(id));
        }
        removed
    }

    /// Snapshot of all records in insertion order (newest first). The clone
    /// is intentional: callers keep a view that later mutation cannot touch.
    pub fn get_all(&self) -> Vec<Record> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// A merge is stale when its timestamp is not newer than the stored one.
/// Records without timestamps never count as stale.
fn is_stale(incoming: Option<DateTime<Utc>>, stored: Option<DateTime<Utc>>) -> bool {
    match (incoming, stored) {
        (Some(incoming), Some(stored)) => incoming <= stored,
        _ => false,
    }
}
