use std::collections::HashSet;

use crate::record::RecordId;

/// Ids the user has checked, decoupled from the current page, filter, and
/// sort. A selection survives any view change as long as its record exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: HashSet<RecordId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: RecordId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Header-checkbox semantics, scoped to the rows on the current page:
    /// if every page row is already selected the page is deselected,
    /// otherwise every page row becomes selected. Rows on other pages are
    /// untouched either way.
    pub fn toggle_page(&mut self, page_ids: &[RecordId]) {
        if page_ids.is_empty() {
            return;
        }
        if page_ids.iter().all(|id| self.selected.contains(id)) {
            for id in page_ids {
                self.selected.remove(id);
            }
        } else {
            self.selected.extend(page_ids.iter().copied());
        }
    }

    /// Drops selections whose record left the store, so stale ids can never
    /// feed a later bulk command.
    pub fn prune<I>(&mut self, existing: I)
    where
        I: IntoIterator<Item = RecordId>,
    {
        let existing: HashSet<RecordId> = existing.into_iter().collect();
        self.selected.retain(|id| existing.contains(id));
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selected.contains(&id)
    }

    /// Sorted for deterministic batch payloads and assertions.
    pub fn selected_ids(&self) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}
