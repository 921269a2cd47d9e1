//! Identity provider clients.
//!
//! `GotrueProvider` talks to the hosted auth service over HTTP;
//! `MockProvider` is an in-memory stand-in for development and tests.

mod gotrue;
mod mock;

pub use gotrue::GotrueProvider;
pub use mock::MockProvider;
