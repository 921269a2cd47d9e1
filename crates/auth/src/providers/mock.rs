//! In-memory identity provider for development and testing.
//!
//! Honors the real provider's contract: authorization codes are single-use,
//! refresh rotates both tokens, and revoked sessions stop validating.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use credview_core::{
    IdentityProvider, Principal, ProviderError, Result, SessionGrant, SessionTokens,
};
use rand::{distr::Alphanumeric, Rng};
use url::Url;

const ACCESS_TOKEN_TTL_SECS: u64 = 3600;

#[derive(Default)]
struct Inner {
    /// Pending single-use authorization codes.
    codes: HashMap<String, Principal>,
    /// Live access tokens.
    sessions: HashMap<String, Principal>,
    /// Live refresh tokens.
    refresh_tokens: HashMap<String, Principal>,
    /// When set, every call fails as if the provider were unreachable.
    fail_transport: bool,
}

/// Mock provider backed by in-process maps.
#[derive(Default)]
pub struct MockProvider {
    inner: Mutex<Inner>,
}

fn random_token(prefix: &str) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    format!("{prefix}-{suffix}")
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a single-use authorization code for `principal`, as the hosted
    /// provider would after a completed OAuth redirect.
    pub fn issue_code(&self, principal: Principal) -> String {
        let code = random_token("code");
        self.inner
            .lock()
            .expect("mock provider lock")
            .codes
            .insert(code.clone(), principal);
        code
    }

    /// Issue a live session directly, bypassing the code exchange.
    pub fn issue_session(&self, principal: Principal) -> SessionTokens {
        let mut inner = self.inner.lock().expect("mock provider lock");
        Self::grant_locked(&mut inner, principal).tokens
    }

    /// Revoke an access token so `get_user` stops validating it.
    pub fn revoke_access(&self, access_token: &str) {
        self.inner
            .lock()
            .expect("mock provider lock")
            .sessions
            .remove(access_token);
    }

    /// Revoke a refresh token so refresh attempts are rejected.
    pub fn revoke_refresh(&self, refresh_token: &str) {
        self.inner
            .lock()
            .expect("mock provider lock")
            .refresh_tokens
            .remove(refresh_token);
    }

    /// Make every subsequent call fail as a transport error.
    pub fn set_fail_transport(&self, fail: bool) {
        self.inner.lock().expect("mock provider lock").fail_transport = fail;
    }

    fn grant_locked(inner: &mut Inner, principal: Principal) -> SessionGrant {
        let tokens = SessionTokens {
            access_token: random_token("at"),
            refresh_token: random_token("rt"),
            expires_in: ACCESS_TOKEN_TTL_SECS,
        };
        inner
            .sessions
            .insert(tokens.access_token.clone(), principal.clone());
        inner
            .refresh_tokens
            .insert(tokens.refresh_token.clone(), principal.clone());
        SessionGrant { principal, tokens }
    }

    fn check_transport(inner: &Inner) -> Result<()> {
        if inner.fail_transport {
            Err(ProviderError::transport("mock provider unreachable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    async fn authorize_url(&self, provider: &str, redirect_to: &Url) -> Result<Url> {
        let mut url = Url::parse("http://localhost:9999/auth/v1/authorize")
            .map_err(ProviderError::transport)?;
        url.query_pairs_mut()
            .append_pair("provider", provider)
            .append_pair("redirect_to", redirect_to.as_str());
        Ok(url)
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<Principal>> {
        let inner = self.inner.lock().expect("mock provider lock");
        Self::check_transport(&inner)?;
        Ok(inner.sessions.get(access_token).cloned())
    }

    async fn exchange_code(&self, code: &str) -> Result<SessionGrant> {
        let mut inner = self.inner.lock().expect("mock provider lock");
        Self::check_transport(&inner)?;
        match inner.codes.remove(code) {
            Some(principal) => Ok(Self::grant_locked(&mut inner, principal)),
            None => Err(ProviderError::rejected(
                "Authorization code is invalid or has already been used",
            )),
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<SessionGrant> {
        let mut inner = self.inner.lock().expect("mock provider lock");
        Self::check_transport(&inner)?;
        match inner.refresh_tokens.remove(refresh_token) {
            Some(principal) => Ok(Self::grant_locked(&mut inner, principal)),
            None => Err(ProviderError::rejected("Refresh token is invalid")),
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let mut inner = self.inner.lock().expect("mock provider lock");
        Self::check_transport(&inner)?;
        inner.sessions.remove(access_token);
        Ok(())
    }
}
