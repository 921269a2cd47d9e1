//! Core logic for the credview auth flow.
//!
//! Everything in this crate is I/O-free: route policy evaluation, redirect
//! composition, post-login path validation, and the identity-provider
//! abstraction the `credview_auth` crate implements over HTTP.

mod error;
mod policy;
mod redirect;
mod traits;
mod types;
mod validation;

pub use error::ProviderError;
pub use policy::{RouteClass, RouteDecision, RoutePolicy};
pub use redirect::RedirectIntent;
pub use traits::{IdentityProvider, Result};
pub use types::{CookieMutation, Principal, SessionGrant, SessionTokens};
pub use validation::validate_next_path;
