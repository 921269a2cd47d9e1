//! Observable auth state for the presentation layer.
//!
//! Replaces ambient global `user`/`session` state with an explicit store:
//! subscribers receive the current snapshot immediately and every update
//! afterwards, and unsubscribe by dropping the receiver. The UI uses this
//! only to decide whether to show a sign-in affordance; no policy logic
//! lives on this path.

use credview_core::Principal;
use tokio::sync::watch;

/// Current auth state as the presentation layer sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub principal: Option<Principal>,
    /// True until the first resolution completes.
    pub loading: bool,
}

/// Watch-channel-backed auth state store, created once at application root.
#[derive(Debug)]
pub struct AuthStore {
    tx: watch::Sender<AuthSnapshot>,
}

impl AuthStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthSnapshot {
            principal: None,
            loading: true,
        });
        Self { tx }
    }

    /// Current value without subscribing.
    pub fn snapshot(&self) -> AuthSnapshot {
        self.tx.borrow().clone()
    }

    /// Subscribe to auth-state changes. The receiver borrows the current
    /// value immediately; `changed().await` yields on each update.
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.tx.subscribe()
    }

    pub fn set_authenticated(&self, principal: Principal) {
        self.tx.send_replace(AuthSnapshot {
            principal: Some(principal),
            loading: false,
        });
    }

    pub fn set_unauthenticated(&self) {
        self.tx.send_replace(AuthSnapshot {
            principal: None,
            loading: false,
        });
    }
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}
