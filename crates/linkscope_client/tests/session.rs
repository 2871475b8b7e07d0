use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use linkscope_client::{ApiError, AuthContext, SessionHandle, StreamSettings, UrlApi};
use linkscope_core::{CommandKind, Effect, Msg, Record, RecordId};

/// Scripted transport: canned records, optional failure, optional latency.
struct StubApi {
    records: Vec<Record>,
    fail_commands: bool,
    latency: Duration,
}

impl StubApi {
    fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            fail_commands: false,
            latency: Duration::ZERO,
        }
    }

    async fn settle(&self) -> Result<(), ApiError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.fail_commands {
            return Err(ApiError::Status {
                code: 500,
                message: "stub failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UrlApi for StubApi {
    async fn fetch_records(&self) -> Result<Vec<Record>, ApiError> {
        Ok(self.records.clone())
    }

    async fn submit_url(&self, url: &str) -> Result<Record, ApiError> {
        Ok(Record::new(99, url))
    }

    async fn start_records(&self, _ids: &[RecordId]) -> Result<(), ApiError> {
        self.settle().await
    }

    async fn stop_records(&self, _ids: &[RecordId]) -> Result<(), ApiError> {
        self.settle().await
    }

    async fn delete_records(&self, _ids: &[RecordId]) -> Result<(), ApiError> {
        self.settle().await
    }

    async fn record_detail(&self, id: RecordId) -> Result<Record, ApiError> {
        Ok(Record::new(id, "https://example.com"))
    }
}

/// The stream endpoint is unreachable in these tests; a long reconnect delay
/// keeps the channel quiet while effects are exercised.
fn quiet_stream() -> StreamSettings {
    let mut settings = StreamSettings::new("http://127.0.0.1:9");
    settings.reconnect_delay = Duration::from_secs(60);
    settings
}

fn session_with(api: StubApi) -> SessionHandle {
    SessionHandle::new(Arc::new(api), quiet_stream(), AuthContext::anonymous())
}

fn wait_for_msg(session: &SessionHandle, deadline: Duration) -> Option<Msg> {
    let started = Instant::now();
    while started.elapsed() < deadline {
        if let Some(msg) = session.try_recv() {
            return Some(msg);
        }
        thread::sleep(Duration::from_millis(10));
    }
    None
}

#[test]
fn fetch_effect_comes_back_as_records_loaded() {
    let session = session_with(StubApi::new(vec![Record::new(1, "https://example.com")]));

    session.dispatch(vec![Effect::FetchRecords]);

    match wait_for_msg(&session, Duration::from_secs(5)) {
        Some(Msg::RecordsLoaded(records)) => {
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].id, 1);
        }
        other => panic!("expected RecordsLoaded, got {other:?}"),
    }
}

#[test]
fn submit_effect_comes_back_as_add_accepted() {
    let session = session_with(StubApi::new(Vec::new()));

    session.dispatch(vec![Effect::SubmitUrl {
        url: "https://new.example.com".to_string(),
    }]);

    match wait_for_msg(&session, Duration::from_secs(5)) {
        Some(Msg::AddAccepted(record)) => assert_eq!(record.url, "https://new.example.com"),
        other => panic!("expected AddAccepted, got {other:?}"),
    }
}

#[test]
fn failed_command_reports_ids_and_message() {
    let mut api = StubApi::new(Vec::new());
    api.fail_commands = true;
    let session = session_with(api);

    session.dispatch(vec![Effect::StartRecords { ids: vec![4, 5] }]);

    match wait_for_msg(&session, Duration::from_secs(5)) {
        Some(Msg::CommandFailed {
            command,
            ids,
            message,
        }) => {
            assert_eq!(command, CommandKind::Start);
            assert_eq!(ids, vec![4, 5]);
            assert!(message.contains("stub failure"));
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[test]
fn successful_delete_reports_its_ids() {
    let session = session_with(StubApi::new(Vec::new()));

    session.dispatch(vec![Effect::DeleteRecords { ids: vec![7] }]);

    match wait_for_msg(&session, Duration::from_secs(5)) {
        Some(Msg::CommandSucceeded { command, ids }) => {
            assert_eq!(command, CommandKind::Delete);
            assert_eq!(ids, vec![7]);
        }
        other => panic!("expected CommandSucceeded, got {other:?}"),
    }
}

#[test]
fn completions_after_shutdown_never_surface() {
    let mut api = StubApi::new(Vec::new());
    api.latency = Duration::from_millis(150);
    let session = session_with(api);

    session.dispatch(vec![Effect::StartRecords { ids: vec![1] }]);
    session.shutdown();
    // Calling it again must be harmless.
    session.shutdown();

    // The stub settles at 150ms; give it room to (wrongly) deliver.
    assert_eq!(wait_for_msg(&session, Duration::from_millis(400)), None);
}
