use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use linkscope_core::{Record, RecordId};

use crate::auth::AuthContext;
use crate::error::{map_transport_error, ApiError};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Origin plus path prefix, without a trailing slash, e.g. `http://host/api`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ApiSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The transport seam the core depends on. Effects are executed against this
/// trait, so tests and alternative transports slot in without touching the
/// reducer.
#[async_trait]
pub trait UrlApi: Send + Sync {
    async fn fetch_records(&self) -> Result<Vec<Record>, ApiError>;
    async fn submit_url(&self, url: &str) -> Result<Record, ApiError>;
    async fn start_records(&self, ids: &[RecordId]) -> Result<(), ApiError>;
    async fn stop_records(&self, ids: &[RecordId]) -> Result<(), ApiError>;
    async fn delete_records(&self, ids: &[RecordId]) -> Result<(), ApiError>;
    /// Detail view fetch; returns the record with structured broken links.
    async fn record_detail(&self, id: RecordId) -> Result<Record, ApiError>;
}

/// REST implementation over reqwest.
#[derive(Debug, Clone)]
pub struct HttpUrlApi {
    client: reqwest::Client,
    settings: ApiSettings,
    auth: AuthContext,
}

impl HttpUrlApi {
    pub fn new(settings: ApiSettings, auth: AuthContext) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self {
            client,
            settings,
            auth,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.settings.base_url)
    }

    /// Sends with the current bearer token attached and maps non-2xx
    /// responses, preferring the body's `error` field as the message.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = match self.auth.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = error_body_message(response)
            .await
            .unwrap_or_else(|| status.to_string());
        Err(ApiError::Status {
            code: status.as_u16(),
            message,
        })
    }

    async fn post_batch(&self, path: &str, ids: &[RecordId]) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.endpoint(path))
            .json(&serde_json::json!({ "ids": ids }));
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl UrlApi for HttpUrlApi {
    async fn fetch_records(&self) -> Result<Vec<Record>, ApiError> {
        let response = self.send(self.client.get(self.endpoint("/urls"))).await?;
        let envelope: UrlsEnvelope = response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(envelope.urls)
    }

    async fn submit_url(&self, url: &str) -> Result<Record, ApiError> {
        let request = self
            .client
            .post(self.endpoint("/urls"))
            .json(&serde_json::json!({ "url": url }));
        let response = self.send(request).await?;
        response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn start_records(&self, ids: &[RecordId]) -> Result<(), ApiError> {
        self.post_batch("/urls/start", ids).await
    }

    async fn stop_records(&self, ids: &[RecordId]) -> Result<(), ApiError> {
        self.post_batch("/urls/stop", ids).await
    }

    async fn delete_records(&self, ids: &[RecordId]) -> Result<(), ApiError> {
        self.post_batch("/urls/delete", ids).await
    }

    async fn record_detail(&self, id: RecordId) -> Result<Record, ApiError> {
        let response = self
            .send(self.client.get(self.endpoint(&format!("/urls/{id}"))))
            .await?;
        response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}

#[derive(Deserialize)]
struct UrlsEnvelope {
    #[serde(default)]
    urls: Vec<Record>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

async fn error_body_message(response: reqwest::Response) -> Option<String> {
    let body = response.text().await.ok()?;
    serde_json::from_str::<ErrorBody>(&body)
        .ok()?
        .error
        .filter(|message| !message.is_empty())
}
