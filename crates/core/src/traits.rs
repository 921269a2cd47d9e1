use async_trait::async_trait;
use url::Url;

use super::{Principal, ProviderError, SessionGrant};

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Abstraction over the hosted identity provider.
///
/// The application treats the provider as a black box: it issues single-use
/// authorization codes, exchanges them for sessions, and is the sole
/// authority on whether a session is still valid.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Hosted authorize URL for the named OAuth provider (e.g. "google").
    /// `redirect_to` is our callback URL, carried through the flow.
    async fn authorize_url(&self, provider: &str, redirect_to: &Url) -> Result<Url>;

    /// Revalidate an access token with the provider.
    ///
    /// `Ok(None)` means the provider examined the token and rejected it
    /// (expired or revoked). `Err(Transport)` means the validation call
    /// itself failed; callers must fail closed.
    async fn get_user(&self, access_token: &str) -> Result<Option<Principal>>;

    /// Exchange a single-use authorization code for a session.
    async fn exchange_code(&self, code: &str) -> Result<SessionGrant>;

    /// Trade a refresh token for a fresh session, rotating both tokens.
    async fn refresh_session(&self, refresh_token: &str) -> Result<SessionGrant>;

    /// End the session held by `access_token` on the provider side.
    async fn sign_out(&self, access_token: &str) -> Result<()>;
}
