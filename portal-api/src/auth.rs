//! Bearer token injection.

use async_trait::async_trait;

use crate::error::Result;

/// Source of the bearer token attached to every request.
///
/// Implementations may hit a refresh endpoint, read a keychain, or (for the
/// demo portal) fabricate a token. Returning `Ok(None)` sends the request
/// anonymously; returning an error aborts the request before anything goes
/// on the wire and surfaces as [`ApiError::Authentication`](crate::ApiError::Authentication).
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current access token, if the user is signed in.
    async fn access_token(&self) -> Result<Option<String>>;
}

/// A fixed token (or none). Handy for scripts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// A provider that never attaches a token.
    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<Option<String>> {
        Ok(self.token.clone())
    }
}
