//! HTTP handlers for the auth routes.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::CookieJar;
use credview_core::{validate_next_path, ProviderError, RedirectIntent};
use serde::Deserialize;

use crate::cookies::{self, apply_mutations};
use crate::middleware::found_redirect;
use crate::state::AuthState;

/// Landing path for a completed sign-in when the callback carries no
/// (valid) destination.
const DEFAULT_NEXT: &str = "/dashboard";

/// Fixed user-facing text for failures we could not even get a provider
/// verdict on. The underlying cause goes to the log, not the URL.
const SERVICE_ERROR_MESSAGE: &str = "Authentication service error";

/// Query parameters for the OAuth callback.
#[derive(Deserialize, Default)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub next: Option<String>,
}

/// Query parameters for sign-in initiation.
#[derive(Deserialize, Default)]
pub struct SignInQuery {
    /// OAuth provider name (e.g. "google").
    pub provider: Option<String>,
    pub next: Option<String>,
}

/// Creates the auth router.
///
/// Routes:
/// - `GET /auth/callback` - Exchange the authorization code for a session
/// - `GET /auth/signin` - Redirect to the provider's hosted authorize page
/// - `POST /auth/signout` - End the session and clear cookies
pub fn auth_routes() -> Router<AuthState> {
    Router::new()
        .route("/auth/callback", get(callback))
        .route("/auth/signin", get(signin))
        .route("/auth/signout", post(signout))
}

/// OAuth callback: single pass, every branch terminates in a redirect.
async fn callback(
    State(state): State<AuthState>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> Response {
    let origin = &state.config.base_url;

    let Some(code) = query.code else {
        // No code: nothing to exchange, plain redirect home.
        return found_redirect(&RedirectIntent::to("/").compose(origin));
    };

    let next = query
        .next
        .as_deref()
        .and_then(validate_next_path)
        .unwrap_or(DEFAULT_NEXT)
        .to_string();

    match state.provider.exchange_code(&code).await {
        Ok(grant) => {
            tracing::info!(user = %grant.principal.id, "code exchange succeeded");
            state.store.set_authenticated(grant.principal);
            let jar = apply_mutations(
                jar,
                &cookies::mutations_for_tokens(&grant.tokens),
                state.config.cookie_secure,
            );
            let url = RedirectIntent::to(&next).compose(origin);
            (jar, found_redirect(&url)).into_response()
        }
        Err(ProviderError::Rejected { message }) => {
            // Provider understood and refused; its reason is shown verbatim.
            // Replayed single-use codes land here by provider contract.
            tracing::warn!(%message, "provider rejected code exchange");
            found_redirect(&RedirectIntent::auth_error(&message).compose(origin))
        }
        Err(ProviderError::MissingPrincipal) => {
            tracing::error!("code exchange succeeded but returned no principal");
            found_redirect(&RedirectIntent::auth_error("Authentication failed").compose(origin))
        }
        Err(ProviderError::Transport(cause)) => {
            tracing::error!(%cause, "code exchange call failed");
            found_redirect(&RedirectIntent::auth_error(SERVICE_ERROR_MESSAGE).compose(origin))
        }
    }
}

/// Sign-in initiation: redirect to the provider's hosted authorize URL with
/// our callback (and the validated destination) as `redirect_to`.
async fn signin(State(state): State<AuthState>, Query(query): Query<SignInQuery>) -> Response {
    let origin = &state.config.base_url;
    let provider_name = query.provider.as_deref().unwrap_or("google");

    let mut redirect_to = state.callback_url();
    if let Some(next) = query.next.as_deref().and_then(validate_next_path) {
        redirect_to.query_pairs_mut().append_pair("next", next);
    }

    match state.provider.authorize_url(provider_name, &redirect_to).await {
        Ok(url) => found_redirect(&url),
        Err(err) => {
            tracing::error!(error = %err, provider = provider_name, "failed to build authorize URL");
            found_redirect(&RedirectIntent::auth_error(SERVICE_ERROR_MESSAGE).compose(origin))
        }
    }
}

/// Sign-out: best-effort provider call, then drop the session cookies.
async fn signout(State(state): State<AuthState>, jar: CookieJar) -> Response {
    if let Some(token) = cookies::access_token(&jar) {
        // Session destruction is the provider's job; a failure here still
        // clears our cookies.
        if let Err(err) = state.provider.sign_out(&token).await {
            tracing::warn!(error = %err, "provider sign-out failed");
        }
    }

    state.store.set_unauthenticated();
    let jar = apply_mutations(
        jar,
        &cookies::clear_session_mutations(),
        state.config.cookie_secure,
    );
    let url = RedirectIntent::to("/").compose(&state.config.base_url);
    (jar, found_redirect(&url)).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header::LOCATION, Request, StatusCode},
    };
    use credview_core::Principal;
    use tower::ServiceExt;

    use super::*;
    use crate::config::AuthConfig;
    use crate::providers::MockProvider;

    fn principal() -> Principal {
        Principal {
            id: "user-1".to_string(),
            email: "user@example.com".to_string(),
            name: Some("Test User".to_string()),
            avatar_url: None,
        }
    }

    fn state_with(provider: Arc<MockProvider>) -> AuthState {
        AuthState::new(provider, AuthConfig::for_testing())
    }

    fn app(state: AuthState) -> Router {
        auth_routes().with_state(state)
    }

    fn location(response: &axum::response::Response) -> String {
        response
            .headers()
            .get(LOCATION)
            .expect("redirect has a location")
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn callback_with_valid_code_redirects_to_next() {
        let provider = Arc::new(MockProvider::new());
        let code = provider.issue_code(principal());
        let state = state_with(provider);

        let response = app(state.clone())
            .oneshot(
                Request::builder()
                    .uri(format!("/auth/callback?code={code}&next=%2Fdashboard%2Fprofile"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            location(&response),
            "http://localhost:3000/dashboard/profile"
        );
        // Session cookies ride on the redirect.
        assert!(response.headers().get_all("set-cookie").iter().count() >= 2);
        // The observable store saw the sign-in.
        assert_eq!(
            state.store.snapshot().principal.unwrap().id,
            "user-1"
        );
    }

    #[tokio::test]
    async fn callback_defaults_next_to_dashboard() {
        let provider = Arc::new(MockProvider::new());
        let code = provider.issue_code(principal());

        let response = app(state_with(provider))
            .oneshot(
                Request::builder()
                    .uri(format!("/auth/callback?code={code}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(location(&response), "http://localhost:3000/dashboard");
    }

    #[tokio::test]
    async fn callback_rejects_unsafe_next_and_falls_back() {
        let provider = Arc::new(MockProvider::new());
        let code = provider.issue_code(principal());

        let response = app(state_with(provider))
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/auth/callback?code={code}&next=https%3A%2F%2Fevil.com"
                    ))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(location(&response), "http://localhost:3000/dashboard");
    }

    #[tokio::test]
    async fn callback_without_code_redirects_home_unannotated() {
        let response = app(state_with(Arc::new(MockProvider::new())))
            .oneshot(
                Request::builder()
                    .uri("/auth/callback")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "http://localhost:3000/");
    }

    #[tokio::test]
    async fn replayed_code_redirects_with_provider_message() {
        let provider = Arc::new(MockProvider::new());
        let code = provider.issue_code(principal());
        let state = state_with(provider);

        // First exchange consumes the code.
        app(state.clone())
            .oneshot(
                Request::builder()
                    .uri(format!("/auth/callback?code={code}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let replay = app(state)
            .oneshot(
                Request::builder()
                    .uri(format!("/auth/callback?code={code}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(replay.status(), StatusCode::FOUND);
        let location = location(&replay);
        assert!(location.starts_with("http://localhost:3000/?auth=error&message="));
    }

    #[tokio::test]
    async fn transport_failure_redirects_with_generic_message() {
        let provider = Arc::new(MockProvider::new());
        let code = provider.issue_code(principal());
        provider.set_fail_transport(true);

        let response = app(state_with(provider))
            .oneshot(
                Request::builder()
                    .uri(format!("/auth/callback?code={code}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            location(&response),
            "http://localhost:3000/?auth=error&message=Authentication+service+error"
        );
    }

    #[tokio::test]
    async fn signin_redirects_to_provider_authorize_url() {
        let response = app(state_with(Arc::new(MockProvider::new())))
            .oneshot(
                Request::builder()
                    .uri("/auth/signin?provider=google&next=%2Fdashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        let location = location(&response);
        assert!(location.contains("/auth/v1/authorize"));
        assert!(location.contains("provider=google"));
        assert!(location.contains("redirect_to="));
    }

    #[tokio::test]
    async fn signout_clears_cookies_and_redirects_home() {
        let provider = Arc::new(MockProvider::new());
        let tokens = provider.issue_session(principal());
        let state = state_with(provider);
        state.store.set_authenticated(principal());

        let response = app(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/signout")
                    .header(
                        "cookie",
                        format!(
                            "{}={}",
                            crate::cookies::ACCESS_TOKEN_COOKIE,
                            tokens.access_token
                        ),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "http://localhost:3000/");
        assert!(state.store.snapshot().principal.is_none());

        let set_cookies: Vec<_> = response
            .headers()
            .get_all("set-cookie")
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        // Removal cookies carry an expiry in the past.
        assert!(set_cookies
            .iter()
            .any(|c| c.starts_with(crate::cookies::ACCESS_TOKEN_COOKIE)));
    }
}
