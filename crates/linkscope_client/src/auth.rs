use std::fmt;
use std::sync::Arc;

/// Supplies the access token current at call time.
///
/// Token acquisition lives outside this crate; hosts hand in an accessor so
/// every request and stream connection picks up whatever credential is valid
/// right now, with no ambient global state involved.
pub trait AccessTokenProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// No credentials; requests go out without an Authorization header.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl AccessTokenProvider for Anonymous {
    fn access_token(&self) -> Option<String> {
        None
    }
}

/// Fixed token, for tests and static API keys.
#[derive(Clone)]
pub struct StaticToken(pub String);

impl AccessTokenProvider for StaticToken {
    fn access_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// The auth dependency threaded into the API client and the live update
/// channel as an explicit constructor parameter.
#[derive(Clone)]
pub struct AuthContext {
    provider: Arc<dyn AccessTokenProvider>,
}

impl AuthContext {
    pub fn new(provider: Arc<dyn AccessTokenProvider>) -> Self {
        Self { provider }
    }

    pub fn anonymous() -> Self {
        Self::new(Arc::new(Anonymous))
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new(Arc::new(StaticToken(token.into())))
    }

    pub fn access_token(&self) -> Option<String> {
        self.provider.access_token()
    }
}

impl fmt::Debug for AuthContext {
    // Tokens never end up in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext").finish_non_exhaustive()
    }
}
