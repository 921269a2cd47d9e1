use serde::{Deserialize, Serialize};

/// Identity resolved from a valid provider session.
///
/// Read-only from the application's perspective; profile fields come from the
/// upstream provider and are never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Provider's unique user identifier.
    pub id: String,
    /// User's email address.
    pub email: String,
    /// User's display name.
    pub name: Option<String>,
    /// Avatar URL from provider profile data.
    pub avatar_url: Option<String>,
}

/// Opaque access/refresh token pair issued by the identity provider.
///
/// The application never decodes these; it only carries them in cookies and
/// hands them back to the provider for revalidation or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds, as reported by the provider.
    pub expires_in: u64,
}

/// Result of a successful code exchange or token refresh.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub principal: Principal,
    pub tokens: SessionTokens,
}

/// A cookie rewrite the session resolver wants applied to the outgoing
/// response.
///
/// The provider rotates tokens as a side effect of validation; modeling the
/// rewrites as explicit values keeps that side channel visible in the
/// resolver's contract instead of hidden behind shared mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieMutation {
    Set {
        name: String,
        value: String,
        /// Cookie lifetime in seconds.
        max_age: u64,
    },
    Remove {
        name: String,
    },
}

impl CookieMutation {
    pub fn set(name: impl Into<String>, value: impl Into<String>, max_age: u64) -> Self {
        Self::Set {
            name: name.into(),
            value: value.into(),
            max_age,
        }
    }

    pub fn remove(name: impl Into<String>) -> Self {
        Self::Remove { name: name.into() }
    }
}
