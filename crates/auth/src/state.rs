//! Shared state for the auth handlers and middleware.

use std::sync::Arc;

use axum::extract::FromRef;
use credview_core::{IdentityProvider, RoutePolicy};
use url::Url;

use crate::config::AuthConfig;
use crate::resolver::SessionResolver;
use crate::store::AuthStore;

/// Shared state: the provider client, the resolver wrapping it, the route
/// policy, and the observable auth store.
#[derive(Clone)]
pub struct AuthState {
    pub provider: Arc<dyn IdentityProvider>,
    pub resolver: SessionResolver,
    pub policy: RoutePolicy,
    pub store: Arc<AuthStore>,
    pub config: AuthConfig,
}

impl AuthState {
    pub fn new(provider: Arc<dyn IdentityProvider>, config: AuthConfig) -> Self {
        Self {
            resolver: SessionResolver::new(provider.clone()),
            provider,
            policy: RoutePolicy::default(),
            store: Arc::new(AuthStore::new()),
            config,
        }
    }

    pub fn with_policy(mut self, policy: RoutePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Absolute URL of our OAuth callback, handed to the provider as the
    /// post-authorization redirect target.
    pub fn callback_url(&self) -> Url {
        self.config
            .base_url
            .join("/auth/callback")
            .expect("base URL joins a static path")
    }
}

/// Allows AuthState to be extracted from a parent state.
impl<S> FromRef<S> for AuthState
where
    S: AsRef<AuthState>,
{
    fn from_ref(state: &S) -> Self {
        state.as_ref().clone()
    }
}
