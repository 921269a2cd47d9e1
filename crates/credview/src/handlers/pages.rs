//! Placeholder page handlers.
//!
//! The product pages are presentational shells; the only contract that
//! matters here is the landing page surfacing a sign-in affordance when the
//! middleware redirected with `auth=required` or `auth=error`.

use axum::{
    extract::{Path, Query},
    response::Html,
};
use serde::Deserialize;

/// Query annotations the middleware and callback attach to home redirects.
#[derive(Deserialize, Default)]
pub struct HomeQuery {
    pub auth: Option<String>,
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
    pub message: Option<String>,
}

/// Escape text destined for an HTML body. The `message` annotation carries
/// provider-supplied text and must never land in the page unescaped.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Handler for the landing page (GET /).
pub async fn home(Query(query): Query<HomeQuery>) -> Html<String> {
    let banner = match query.auth.as_deref() {
        Some("required") => {
            let next = query.redirect_to.as_deref().unwrap_or("/dashboard");
            format!(
                r#"<p class="banner">Please sign in to continue. <a href="/auth/signin?next={}">Sign in</a></p>"#,
                escape_html(next)
            )
        }
        Some("error") => {
            let message = query.message.as_deref().unwrap_or("Authentication failed");
            format!(r#"<p class="banner error">{}</p>"#, escape_html(message))
        }
        _ => String::new(),
    };

    Html(format!(
        r#"<!doctype html>
<html>
<head><title>credview</title></head>
<body>
<h1>credview</h1>
<p>Understand your credit score, track EMIs, compare lenders.</p>
{banner}
</body>
</html>"#
    ))
}

/// Handler for the sign-in entry page (GET /auth). The middleware redirects
/// authenticated users away before this runs.
pub async fn auth_page() -> Html<&'static str> {
    Html(
        r#"<!doctype html>
<html>
<head><title>Sign in - credview</title></head>
<body>
<h1>Sign in</h1>
<a href="/auth/signin?provider=google">Continue with Google</a>
</body>
</html>"#,
    )
}

/// Handler for the dashboard root (GET /dashboard).
pub async fn dashboard() -> Html<&'static str> {
    Html(
        r#"<!doctype html>
<html>
<head><title>Dashboard - credview</title></head>
<body>
<h1>Dashboard</h1>
<nav>
<a href="/dashboard/credit-score">Credit score</a>
<a href="/dashboard/emi-reminders">EMI reminders</a>
<a href="/dashboard/nbfc-comparison">NBFC comparison</a>
<a href="/dashboard/profile">Profile</a>
<a href="/dashboard/settings">Settings</a>
</nav>
</body>
</html>"#,
    )
}

/// Handler for dashboard sections (GET /dashboard/{section}).
pub async fn dashboard_section(Path(section): Path<String>) -> Html<String> {
    Html(format!(
        r#"<!doctype html>
<html>
<head><title>{0} - credview</title></head>
<body>
<h1>{0}</h1>
</body>
</html>"#,
        escape_html(&section)
    ))
}
