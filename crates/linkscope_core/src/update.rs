use crate::{CommandKind, DashboardState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: DashboardState, msg: Msg) -> (DashboardState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::UrlSubmitted => state.submit_input().into_iter().collect(),
        Msg::RecordsLoaded(records) => {
            state.finish_load(records);
            Vec::new()
        }
        Msg::LoadFailed(message) => {
            state.fail_load(message);
            Vec::new()
        }
        Msg::AddAccepted(record) => {
            state.accept_added(record);
            Vec::new()
        }
        Msg::AddRejected(message) => {
            state.reject_added(message);
            Vec::new()
        }
        Msg::StartRequested { ids } => state
            .begin_command(CommandKind::Start, ids)
            .into_iter()
            .collect(),
        Msg::StopRequested { ids } => state
            .begin_command(CommandKind::Stop, ids)
            .into_iter()
            .collect(),
        Msg::DeleteRequested { ids } => state
            .begin_command(CommandKind::Delete, ids)
            .into_iter()
            .collect(),
        Msg::CommandSucceeded { command, ids } => {
            state.finish_command(command, &ids);
            Vec::new()
        }
        Msg::CommandFailed { ids, message, .. } => {
            state.fail_command(&ids, message);
            Vec::new()
        }
        Msg::StreamRecord(record) => {
            state.apply_stream(record);
            Vec::new()
        }
        Msg::RowToggled(id) => {
            state.toggle_row(id);
            Vec::new()
        }
        Msg::PageToggled => {
            state.toggle_page();
            Vec::new()
        }
        Msg::GlobalFilterChanged(text) => {
            state.set_global_filter(text);
            Vec::new()
        }
        Msg::ColumnFilterChanged { column, value } => {
            state.set_column_filter(column, value);
            Vec::new()
        }
        Msg::SortCycled(column) => {
            state.cycle_sort(column);
            Vec::new()
        }
        Msg::PageChanged(index) => {
            state.set_page_index(index);
            Vec::new()
        }
        Msg::PageSizeChanged(size) => {
            state.set_page_size(size);
            Vec::new()
        }
        Msg::ErrorDismissed => {
            state.dismiss_error();
            Vec::new()
        }
    };

    (state, effects)
}
