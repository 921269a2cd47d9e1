//! Session resolution against the identity provider.
//!
//! Resolution always revalidates with the provider rather than decoding the
//! token locally, so server-side revocation is observed. A faster local
//! decode cannot see revoked sessions and is deliberately not offered.

use std::sync::Arc;

use axum_extra::extract::CookieJar;
use credview_core::{CookieMutation, IdentityProvider, Principal, ProviderError};

use crate::cookies;

/// Outcome of resolving a request's credential material: who the caller is
/// (if anyone) plus the cookie rewrites the provider's token rotation
/// requires on the outgoing response.
#[derive(Debug, Default)]
pub struct Resolution {
    pub principal: Option<Principal>,
    pub mutations: Vec<CookieMutation>,
}

impl Resolution {
    fn unauthenticated() -> Self {
        Self::default()
    }

    fn authenticated(principal: Principal, mutations: Vec<CookieMutation>) -> Self {
        Self {
            principal: Some(principal),
            mutations,
        }
    }

    fn cleared() -> Self {
        Self {
            principal: None,
            mutations: cookies::clear_session_mutations(),
        }
    }
}

/// Wraps the provider's validation calls for the middleware.
#[derive(Clone)]
pub struct SessionResolver {
    provider: Arc<dyn IdentityProvider>,
}

impl SessionResolver {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Resolve the request's cookies to a principal.
    ///
    /// Never returns an error: a transport failure of the validation call
    /// fails closed, leaving the caller unauthenticated so protected-route
    /// policy still applies. A rejected access token falls back to one
    /// refresh attempt; a rejected refresh clears both session cookies.
    pub async fn resolve(&self, jar: &CookieJar) -> Resolution {
        let access = cookies::access_token(jar);
        let refresh = cookies::refresh_token(jar);

        if let Some(token) = access {
            match self.provider.get_user(&token).await {
                Ok(Some(principal)) => return Resolution::authenticated(principal, Vec::new()),
                Ok(None) => {
                    tracing::debug!("access token rejected by provider, attempting refresh");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "session validation failed, treating as unauthenticated");
                    return Resolution::unauthenticated();
                }
            }
        }

        match refresh {
            Some(token) => self.refresh(&token).await,
            None => Resolution::unauthenticated(),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Resolution {
        match self.provider.refresh_session(refresh_token).await {
            Ok(grant) => {
                tracing::debug!(user = %grant.principal.id, "session refreshed, rotating token cookies");
                let mutations = cookies::mutations_for_tokens(&grant.tokens);
                Resolution::authenticated(grant.principal, mutations)
            }
            Err(ProviderError::Transport(cause)) => {
                tracing::warn!(%cause, "token refresh transport failure, treating as unauthenticated");
                Resolution::unauthenticated()
            }
            Err(err) => {
                tracing::debug!(error = %err, "refresh token rejected, clearing session cookies");
                Resolution::cleared()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::{apply_mutations, mutations_for_tokens};
    use crate::providers::MockProvider;

    fn principal() -> Principal {
        Principal {
            id: "user-1".to_string(),
            email: "user@example.com".to_string(),
            name: Some("Test User".to_string()),
            avatar_url: None,
        }
    }

    fn jar_with(tokens: &credview_core::SessionTokens) -> CookieJar {
        apply_mutations(CookieJar::new(), &mutations_for_tokens(tokens), false)
    }

    #[tokio::test]
    async fn resolves_valid_access_token_without_mutations() {
        let provider = Arc::new(MockProvider::new());
        let tokens = provider.issue_session(principal());
        let resolver = SessionResolver::new(provider);

        let resolution = resolver.resolve(&jar_with(&tokens)).await;

        assert_eq!(resolution.principal.unwrap().id, "user-1");
        assert!(resolution.mutations.is_empty());
    }

    #[tokio::test]
    async fn no_cookies_resolves_unauthenticated() {
        let resolver = SessionResolver::new(Arc::new(MockProvider::new()));

        let resolution = resolver.resolve(&CookieJar::new()).await;

        assert!(resolution.principal.is_none());
        assert!(resolution.mutations.is_empty());
    }

    #[tokio::test]
    async fn revoked_access_token_falls_back_to_refresh_and_rotates_cookies() {
        let provider = Arc::new(MockProvider::new());
        let tokens = provider.issue_session(principal());
        provider.revoke_access(&tokens.access_token);
        let resolver = SessionResolver::new(provider);

        let resolution = resolver.resolve(&jar_with(&tokens)).await;

        assert!(resolution.principal.is_some());
        // Rotated pair comes back as Set mutations for both cookies.
        assert_eq!(resolution.mutations.len(), 2);
        assert!(resolution
            .mutations
            .iter()
            .all(|m| matches!(m, CookieMutation::Set { .. })));
    }

    #[tokio::test]
    async fn rejected_refresh_clears_session_cookies() {
        let provider = Arc::new(MockProvider::new());
        let tokens = provider.issue_session(principal());
        provider.revoke_access(&tokens.access_token);
        provider.revoke_refresh(&tokens.refresh_token);
        let resolver = SessionResolver::new(provider);

        let resolution = resolver.resolve(&jar_with(&tokens)).await;

        assert!(resolution.principal.is_none());
        assert_eq!(resolution.mutations.len(), 2);
        assert!(resolution
            .mutations
            .iter()
            .all(|m| matches!(m, CookieMutation::Remove { .. })));
    }

    #[tokio::test]
    async fn transport_failure_fails_closed_without_clearing_cookies() {
        let provider = Arc::new(MockProvider::new());
        let tokens = provider.issue_session(principal());
        provider.set_fail_transport(true);
        let resolver = SessionResolver::new(provider);

        let resolution = resolver.resolve(&jar_with(&tokens)).await;

        assert!(resolution.principal.is_none());
        // A provider outage must not log the user out.
        assert!(resolution.mutations.is_empty());
    }
}
