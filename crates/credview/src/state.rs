//! Shared application state passed to all request handlers.

use credview_auth::AuthState;

/// Top-level state. Auth handlers extract the nested [`AuthState`] through
/// the `AsRef` impl.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
}

impl AppState {
    pub fn new(auth: AuthState) -> Self {
        Self { auth }
    }
}

impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}
