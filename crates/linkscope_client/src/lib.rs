//! Async side of the dashboard: REST API client, live update channel, and
//! the session runtime that executes reducer effects.
mod api;
mod auth;
mod error;
mod session;
mod stream;

pub use api::{ApiSettings, HttpUrlApi, UrlApi};
pub use auth::{AccessTokenProvider, Anonymous, AuthContext, StaticToken};
pub use error::ApiError;
pub use session::SessionHandle;
pub use stream::{run_status_stream, StreamSettings, UpdateSink};
