//! Session gating and OAuth callback flow for credview.
//!
//! This crate provides:
//! - A session resolver that revalidates cookie-carried tokens with the
//!   hosted identity provider
//! - Route-policy enforcement middleware for axum
//! - The `/auth/*` HTTP handlers (callback, sign-in, sign-out)
//! - An observable auth-state store for the presentation layer

mod config;
mod cookies;
mod handlers;
mod middleware;
mod providers;
mod resolver;
mod state;
mod store;

pub use config::{AuthConfig, ConfigError};
pub use cookies::{apply_mutations, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
pub use handlers::auth_routes;
pub use middleware::enforce_route_policy;
pub use providers::{GotrueProvider, MockProvider};
pub use resolver::{Resolution, SessionResolver};
pub use state::AuthState;
pub use store::{AuthSnapshot, AuthStore};
