use std::collections::HashMap;

use url::Url;

use crate::effect::Effect;
use crate::msg::CommandKind;
use crate::record::{Record, RecordId, RecordPatch, RecordStatus, RecordUpdate};
use crate::selection::Selection;
use crate::store::RecordStore;
use crate::view::{derive_page, Column, ViewState};
use crate::view_model::{DashboardViewModel, RowView, StatusSummary};

const INVALID_URL_MESSAGE: &str = "Please enter a valid URL (e.g., https://example.com)";

/// Whole dashboard state: the record store plus everything derived-adjacent
/// (view parameters, selection, in-flight commands, input and error fields).
///
/// All mutation funnels through `update`; async completions and stream
/// events arrive as messages, so no two mutations ever interleave.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    store: RecordStore,
    view: ViewState,
    selection: Selection,
    /// Busy guard: ids with a command on the wire, and which command.
    in_flight: HashMap<RecordId, CommandKind>,
    url_input: String,
    input_error: Option<String>,
    error: Option<String>,
    loading: bool,
    dirty: bool,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state plus the startup effect that loads the collection.
    pub fn initial() -> (Self, Vec<Effect>) {
        let state = Self {
            loading: true,
            ..Self::default()
        };
        (state, vec![Effect::FetchRecords])
    }

    /// Snapshot for rendering. Rows carry selection and busy markers so a
    /// host never has to reach back into the store.
    pub fn view(&self) -> DashboardViewModel {
        let records = self.store.get_all();
        let page = derive_page(&records, &self.view);
        let rows = page
            .rows
            .into_iter()
            .map(|record| RowView {
                selected: self.selection.is_selected(record.id),
                busy: self.in_flight.contains_key(&record.id),
                record,
            })
            .collect();

        DashboardViewModel {
            rows,
            page_index: page.page_index,
            page_count: page.page_count,
            filtered_count: page.filtered_count,
            total_count: records.len(),
            stats: StatusSummary::tally(&records),
            sort: self.view.sort,
            page_size: self.view.page_size,
            global_filter: self.view.global_filter.clone(),
            selected_ids: self.selection.selected_ids(),
            url_input: self.url_input.clone(),
            input_error: self.input_error.clone(),
            error: self.error.clone(),
            loading: self.loading,
        }
    }

    /// True exactly once after a batch of changes; used to coalesce renders.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn is_busy(&self, id: RecordId) -> bool {
        self.in_flight.contains_key(&id)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        self.url_input = text;
        self.input_error = None;
        self.mark_dirty();
    }

    /// Validates the input before anything touches the network. Invalid
    /// input sets the inline error and produces no effect; the input is kept
    /// until the server accepts it.
    pub(crate) fn submit_input(&mut self) -> Option<Effect> {
        let raw = self.url_input.trim().to_string();
        if raw.is_empty() {
            return None;
        }
        if Url::parse(&raw).is_err() {
            self.input_error = Some(INVALID_URL_MESSAGE.to_string());
            self.mark_dirty();
            return None;
        }
        self.input_error = None;
        Some(Effect::SubmitUrl { url: raw })
    }

    pub(crate) fn finish_load(&mut self, records: Vec<Record>) {
        self.loading = false;
        // Head-first upserts leave the store newest-first whatever order the
        // server returned.
        for record in records {
            self.store.upsert(RecordUpdate::Full(record));
        }
        self.mark_dirty();
    }

    pub(crate) fn fail_load(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn accept_added(&mut self, record: Record) {
        self.store.upsert(RecordUpdate::Full(record));
        self.url_input.clear();
        self.input_error = None;
        self.mark_dirty();
    }

    pub(crate) fn reject_added(&mut self, message: String) {
        self.error = Some(message);
        self.mark_dirty();
    }

    /// Busy-guarded entry point for start/stop/delete.
    ///
    /// Unknown ids are dropped from the batch; a batch left empty is a no-op.
    /// If any surviving target already has a command in flight the whole
    /// command is rejected, mirroring the single batched request it would
    /// have issued. Start and stop apply their optimistic transition to every
    /// eligible target before the request goes out; delete waits for
    /// confirmation.
    pub(crate) fn begin_command(&mut self, kind: CommandKind, ids: Vec<RecordId>) -> Option<Effect> {
        let ids: Vec<RecordId> = ids
            .into_iter()
            .filter(|id| self.store.contains(*id))
            .collect();
        if ids.is_empty() {
            return None;
        }
        if let Some(busy) = ids.iter().find(|id| self.in_flight.contains_key(*id)) {
            self.error = Some(format!("Record {busy} already has a command in flight"));
            self.mark_dirty();
            return None;
        }

        for id in &ids {
            self.in_flight.insert(*id, kind);
        }
        match kind {
            CommandKind::Start => self.apply_optimistic(&ids, RecordStatus::startable, RecordStatus::Running),
            CommandKind::Stop => self.apply_optimistic(&ids, RecordStatus::stoppable, RecordStatus::Stopped),
            CommandKind::Delete => {}
        }
        self.mark_dirty();

        Some(match kind {
            CommandKind::Start => Effect::StartRecords { ids },
            CommandKind::Stop => Effect::StopRecords { ids },
            CommandKind::Delete => Effect::DeleteRecords { ids },
        })
    }

    fn apply_optimistic(
        &mut self,
        ids: &[RecordId],
        eligible: fn(RecordStatus) -> bool,
        next: RecordStatus,
    ) {
        for id in ids {
            let Some(record) = self.store.get(*id) else {
                continue;
            };
            if eligible(record.status) {
                self.store
                    .upsert(RecordUpdate::Partial(RecordPatch::status(*id, next)));
            }
        }
    }

    pub(crate) fn finish_command(&mut self, kind: CommandKind, ids: &[RecordId]) {
        for id in ids {
            self.in_flight.remove(id);
        }
        if kind == CommandKind::Delete {
            self.store.remove(ids);
            let existing: Vec<RecordId> = self.store.ids().collect();
            self.selection.prune(existing);
        }
        self.mark_dirty();
    }

    /// Targets are released but optimistic statuses are left as-is; the live
    /// channel is the corrector of record.
    pub(crate) fn fail_command(&mut self, ids: &[RecordId], message: String) {
        for id in ids {
            self.in_flight.remove(id);
        }
        self.error = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn apply_stream(&mut self, record: Record) {
        if self.store.upsert(RecordUpdate::Full(record)).changed() {
            self.mark_dirty();
        }
    }

    pub(crate) fn toggle_row(&mut self, id: RecordId) {
        if self.store.contains(id) {
            self.selection.toggle(id);
            self.mark_dirty();
        }
    }

    pub(crate) fn toggle_page(&mut self) {
        let records = self.store.get_all();
        let page = derive_page(&records, &self.view);
        let page_ids: Vec<RecordId> = page.rows.iter().map(|record| record.id).collect();
        if !page_ids.is_empty() {
            self.selection.toggle_page(&page_ids);
            self.mark_dirty();
        }
    }

    pub(crate) fn set_global_filter(&mut self, text: String) {
        self.view.set_global_filter(text);
        self.mark_dirty();
    }

    pub(crate) fn set_column_filter(&mut self, column: Column, value: String) {
        self.view.set_column_filter(column, value);
        self.mark_dirty();
    }

    pub(crate) fn cycle_sort(&mut self, column: Column) {
        self.view.cycle_sort(column);
        self.mark_dirty();
    }

    pub(crate) fn set_page_index(&mut self, index: usize) {
        if self.view.page_index != index {
            self.view.page_index = index;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_page_size(&mut self, size: usize) {
        if self.view.set_page_size(size) {
            self.mark_dirty();
        }
    }

    pub(crate) fn dismiss_error(&mut self) {
        if self.error.take().is_some() {
            self.mark_dirty();
        }
    }
}
