use std::sync::{mpsc, Arc};
use std::thread;

use tokio_util::sync::CancellationToken;

use linkscope_core::{CommandKind, Effect, Msg, Record, RecordId};
use scope_logging::{scope_debug, scope_warn};

use crate::api::UrlApi;
use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::stream::{run_status_stream, StreamSettings, UpdateSink};

/// Owns the async side of one dashboard view: a dedicated runtime thread
/// that executes effects against the API, plus the live update channel.
///
/// The handle's cancellation token is the view lifetime. `shutdown` (and
/// `Drop`) cancels it exactly once semantically: the stream stops, queued
/// effects are abandoned, and any in-flight completion is discarded before
/// it can reach a disposed view.
pub struct SessionHandle {
    effect_tx: mpsc::Sender<Effect>,
    msg_rx: mpsc::Receiver<Msg>,
    cancel: CancellationToken,
}

impl SessionHandle {
    pub fn new(api: Arc<dyn UrlApi>, stream: StreamSettings, auth: AuthContext) -> Self {
        let (effect_tx, effect_rx) = mpsc::channel::<Effect>();
        let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
        let cancel = CancellationToken::new();

        let token = cancel.clone();
        let stream_tx = msg_tx.clone();
        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    scope_warn!("session runtime failed to start: {err}");
                    return;
                }
            };

            let sink: Arc<dyn UpdateSink> = Arc::new(MsgSink {
                tx: stream_tx,
                cancel: token.clone(),
            });
            runtime.spawn(run_status_stream(
                stream,
                auth,
                sink,
                token.clone(),
            ));

            while let Ok(effect) = effect_rx.recv() {
                if token.is_cancelled() {
                    break;
                }
                let api = Arc::clone(&api);
                let msg_tx = msg_tx.clone();
                let token = token.clone();
                runtime.spawn(async move {
                    let msg = execute_effect(api.as_ref(), effect).await;
                    // Completion after teardown must not reach the view.
                    if token.is_cancelled() {
                        return;
                    }
                    let _ = msg_tx.send(msg);
                });
            }
            scope_debug!("session effect loop ended");
        });

        Self {
            effect_tx,
            msg_rx,
            cancel,
        }
    }

    /// Queues reducer effects for execution, in order.
    pub fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            let _ = self.effect_tx.send(effect);
        }
    }

    /// Non-blocking message pump; hosts call this from their event loop and
    /// feed each message into `update`.
    pub fn try_recv(&self) -> Option<Msg> {
        self.msg_rx.try_recv().ok()
    }

    /// Tears the session down. Safe to call more than once.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct MsgSink {
    tx: mpsc::Sender<Msg>,
    cancel: CancellationToken,
}

impl UpdateSink for MsgSink {
    fn deliver(&self, record: Record) {
        if self.cancel.is_cancelled() {
            return;
        }
        let _ = self.tx.send(Msg::StreamRecord(record));
    }
}

async fn execute_effect(api: &dyn UrlApi, effect: Effect) -> Msg {
    match effect {
        Effect::FetchRecords => match api.fetch_records().await {
            Ok(records) => Msg::RecordsLoaded(records),
            Err(err) => Msg::LoadFailed(err.to_string()),
        },
        Effect::SubmitUrl { url } => match api.submit_url(&url).await {
            Ok(record) => Msg::AddAccepted(record),
            Err(err) => Msg::AddRejected(err.to_string()),
        },
        Effect::StartRecords { ids } => {
            let result = api.start_records(&ids).await;
            command_result(CommandKind::Start, ids, result)
        }
        Effect::StopRecords { ids } => {
            let result = api.stop_records(&ids).await;
            command_result(CommandKind::Stop, ids, result)
        }
        Effect::DeleteRecords { ids } => {
            let result = api.delete_records(&ids).await;
            command_result(CommandKind::Delete, ids, result)
        }
    }
}

fn command_result(command: CommandKind, ids: Vec<RecordId>, result: Result<(), ApiError>) -> Msg {
    match result {
        Ok(()) => Msg::CommandSucceeded { command, ids },
        Err(err) => {
            scope_warn!("{command:?} for {} record(s) failed: {err}", ids.len());
            Msg::CommandFailed {
                command,
                ids,
                message: err.to_string(),
            }
        }
    }
}
