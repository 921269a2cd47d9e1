//! Route-policy enforcement middleware.
//!
//! Runs on every request: resolves the caller's session with the provider,
//! evaluates the route policy, and either redirects or lets the request
//! through with any cookie rewrites applied to the response.

use axum::{
    extract::{Request, State},
    http::{header::LOCATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use credview_core::{RedirectIntent, RouteDecision};
use url::Url;

use crate::cookies::apply_mutations;
use crate::state::AuthState;

/// `302 Found` to an absolute URL.
pub(crate) fn found_redirect(url: &Url) -> Response {
    (StatusCode::FOUND, [(LOCATION, url.to_string())]).into_response()
}

/// Middleware enforcing the protected/auth-only/public route policy.
///
/// Install with `axum::middleware::from_fn_with_state`.
pub async fn enforce_route_policy(
    State(state): State<AuthState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let resolution = state.resolver.resolve(&jar).await;
    let decision = state.policy.evaluate(&path, resolution.principal.is_some());

    match decision {
        RouteDecision::Allow => {
            let response = next.run(request).await;
            // Token rotation from the resolver rides on the same response.
            let jar = apply_mutations(jar, &resolution.mutations, state.config.cookie_secure);
            (jar, response).into_response()
        }
        RouteDecision::RequireAuth { redirect_to } => {
            tracing::debug!(path = %redirect_to, "unauthenticated request to protected route");
            let url = RedirectIntent::auth_required(&redirect_to).compose(&state.config.base_url);
            found_redirect(&url)
        }
        RouteDecision::RedirectAuthenticated => {
            let url = RedirectIntent::to("/dashboard").compose(&state.config.base_url);
            found_redirect(&url)
        }
    }
}
