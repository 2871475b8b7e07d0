use thiserror::Error;

/// Failures crossing the transport seam, in the shape the reducer surfaces
/// them: one human-readable message per failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Non-2xx response. `message` prefers the body's `error` field over the
    /// bare status line.
    #[error("server returned {code}: {message}")]
    Status { code: u16, message: String },
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response body: {0}")]
    Decode(String),
}

pub(crate) fn map_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    ApiError::Network(err.to_string())
}
