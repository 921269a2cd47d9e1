//! Session cookie names and jar plumbing.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use credview_core::{CookieMutation, SessionTokens};

pub const ACCESS_TOKEN_COOKIE: &str = "cv-access-token";
pub const REFRESH_TOKEN_COOKIE: &str = "cv-refresh-token";

/// Refresh tokens outlive the access token; the provider enforces the real
/// expiry, this only bounds the cookie itself.
const REFRESH_COOKIE_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

/// Read the access token from the request jar, if present.
pub fn access_token(jar: &CookieJar) -> Option<String> {
    jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string())
}

/// Read the refresh token from the request jar, if present.
pub fn refresh_token(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string())
}

/// Cookie rewrites persisting a freshly granted token pair.
pub fn mutations_for_tokens(tokens: &SessionTokens) -> Vec<CookieMutation> {
    vec![
        CookieMutation::set(
            ACCESS_TOKEN_COOKIE,
            tokens.access_token.clone(),
            tokens.expires_in,
        ),
        CookieMutation::set(
            REFRESH_TOKEN_COOKIE,
            tokens.refresh_token.clone(),
            REFRESH_COOKIE_MAX_AGE_SECS,
        ),
    ]
}

/// Cookie rewrites dropping the session pair.
pub fn clear_session_mutations() -> Vec<CookieMutation> {
    vec![
        CookieMutation::remove(ACCESS_TOKEN_COOKIE),
        CookieMutation::remove(REFRESH_TOKEN_COOKIE),
    ]
}

/// Apply resolver-produced mutations to the outgoing jar.
pub fn apply_mutations(
    mut jar: CookieJar,
    mutations: &[CookieMutation],
    secure: bool,
) -> CookieJar {
    for mutation in mutations {
        match mutation {
            CookieMutation::Set {
                name,
                value,
                max_age,
            } => {
                let cookie = Cookie::build((name.clone(), value.clone()))
                    .path("/")
                    .http_only(true)
                    .secure(secure)
                    .same_site(SameSite::Lax)
                    .max_age(time::Duration::seconds(*max_age as i64))
                    .build();
                jar = jar.add(cookie);
            }
            CookieMutation::Remove { name } => {
                let removal = Cookie::build((name.clone(), ""))
                    .path("/")
                    .build();
                jar = jar.remove(removal);
            }
        }
    }
    jar
}
