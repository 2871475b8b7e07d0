use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use tokio_util::sync::CancellationToken;

use linkscope_core::Record;
use scope_logging::{scope_debug, scope_warn};

use crate::auth::AuthContext;
use crate::error::{map_transport_error, ApiError};

#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// Full URL of the push stream endpoint.
    pub endpoint: String,
    /// Pause before reconnecting after the stream drops.
    pub reconnect_delay: Duration,
}

impl StreamSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base = base_url.into();
        Self {
            endpoint: format!("{}/urls/stream", base.trim_end_matches('/')),
            reconnect_delay: Duration::from_secs(2),
        }
    }
}

/// Where decoded stream records go. One `deliver` per server event.
pub trait UpdateSink: Send + Sync {
    fn deliver(&self, record: Record);
}

/// Consumes the server-push stream until cancelled.
///
/// Each SSE event carries one JSON-encoded full record. Malformed events are
/// logged and dropped without disturbing the subscription. A dropped
/// connection reconnects after `reconnect_delay`; events missed in the gap
/// are not replayed, later events for the same id correct the store.
pub async fn run_status_stream(
    settings: StreamSettings,
    auth: AuthContext,
    sink: Arc<dyn UpdateSink>,
    cancel: CancellationToken,
) {
    let client = match reqwest::Client::builder().build() {
        Ok(client) => client,
        Err(err) => {
            scope_warn!("status stream could not build a client: {err}");
            return;
        }
    };

    while !cancel.is_cancelled() {
        match pump_connection(&client, &settings, &auth, sink.as_ref(), &cancel).await {
            Ok(()) => scope_debug!("status stream closed"),
            Err(err) => scope_warn!("status stream error: {err}"),
        }
        if cancel.is_cancelled() {
            break;
        }
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(settings.reconnect_delay) => {}
        }
    }
}

async fn pump_connection(
    client: &reqwest::Client,
    settings: &StreamSettings,
    auth: &AuthContext,
    sink: &dyn UpdateSink,
    cancel: &CancellationToken,
) -> Result<(), ApiError> {
    let mut request = client
        .get(&settings.endpoint)
        .header(ACCEPT, "text/event-stream");
    if let Some(token) = auth.access_token() {
        request = request.bearer_auth(token);
    }

    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            code: status.as_u16(),
            message: status.to_string(),
        });
    }

    let mut body = response.bytes_stream();
    let mut buffer = String::new();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            chunk = body.next() => {
                let Some(chunk) = chunk else {
                    // Server ended the stream; the caller decides on reconnect.
                    return Ok(());
                };
                let chunk = chunk.map_err(map_transport_error)?;
                buffer.push_str(&String::from_utf8_lossy(&chunk));
                drain_events(&mut buffer, sink, cancel);
            }
        }
    }
}

/// Cuts complete events out of the buffer and delivers their payloads.
/// Cancellation is observed between events, never mid-event.
fn drain_events(buffer: &mut String, sink: &dyn UpdateSink, cancel: &CancellationToken) {
    while let Some((end, sep_len)) = next_event_boundary(buffer) {
        let event: String = buffer.drain(..end + sep_len).collect();
        if cancel.is_cancelled() {
            return;
        }
        if let Some(record) = parse_event(&event) {
            sink.deliver(record);
        }
    }
}

/// Events are blank-line separated; servers may use LF or CRLF.
fn next_event_boundary(buffer: &str) -> Option<(usize, usize)> {
    let lf = buffer.find("\n\n").map(|at| (at, 2));
    let crlf = buffer.find("\r\n\r\n").map(|at| (at, 4));
    match (lf, crlf) {
        (Some(lf), Some(crlf)) => Some(if crlf.0 < lf.0 { crlf } else { lf }),
        (lf, crlf) => lf.or(crlf),
    }
}

/// One `data:` payload per event. Comment and heartbeat events carry none
/// and are skipped; unparseable payloads are dropped with a log line.
fn parse_event(event: &str) -> Option<Record> {
    let mut payload = String::new();
    for line in event.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(rest) = line.strip_prefix("data:") {
            if !payload.is_empty() {
                payload.push('\n');
            }
            payload.push_str(rest.trim_start());
        }
    }
    if payload.is_empty() {
        return None;
    }
    match serde_json::from_str::<Record>(&payload) {
        Ok(record) => Some(record),
        Err(err) => {
            scope_warn!("dropping malformed stream event: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::next_event_boundary;

    #[test]
    fn boundary_handles_lf_and_crlf() {
        assert_eq!(next_event_boundary("data: a\n\nrest"), Some((7, 2)));
        assert_eq!(next_event_boundary("data: a\r\n\r\nrest"), Some((7, 4)));
        assert_eq!(next_event_boundary("data: a"), None);
    }

    #[test]
    fn earlier_boundary_wins_when_both_present() {
        let buffer = "a\r\n\r\nb\n\nc";
        assert_eq!(next_event_boundary(buffer), Some((1, 4)));
    }
}
