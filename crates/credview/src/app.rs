use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware,
    routing::get,
    Router,
};
use credview_auth::{auth_routes, enforce_route_policy};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers::pages::{auth_page, dashboard, dashboard_section, home},
    state::AppState,
};

/// Create the application router with all routes and middleware.
///
/// The route-policy middleware wraps everything, including the auth routes:
/// `/auth` is an auth-only prefix, so an already-authenticated user is
/// bounced to the dashboard before any sign-in page renders.
pub fn create_app(state: AppState) -> Router {
    let pages = Router::new()
        .route("/", get(home))
        .route("/auth", get(auth_page))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/{section}", get(dashboard_section));

    Router::new()
        .merge(pages)
        .merge(auth_routes().with_state(state.auth.clone()))
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            enforce_route_policy,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
}
