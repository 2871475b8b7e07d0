//! Linkscope core: pure state machine and view-model helpers for the URL
//! analysis dashboard.
mod effect;
mod msg;
mod record;
mod selection;
mod state;
mod store;
mod update;
mod view;
mod view_model;

pub use effect::Effect;
pub use msg::{CommandKind, Msg};
pub use record::{BrokenLink, Record, RecordId, RecordPatch, RecordStatus, RecordUpdate};
pub use selection::Selection;
pub use state::DashboardState;
pub use store::{RecordStore, UpsertOutcome};
pub use update::update;
pub use view::{
    cell_text, derive_page, Column, PageView, SortDirection, SortSpec, ViewState,
    DEFAULT_PAGE_SIZE, PAGE_SIZES,
};
pub use view_model::{DashboardViewModel, RowView, StatusSummary};
