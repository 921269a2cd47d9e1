//! Redirect-target construction.
//!
//! Both the policy middleware and the callback handler terminate in
//! redirects; composing them through one code path keeps query-parameter
//! encoding in a single place.

use url::Url;

/// A redirect target: path plus query annotations explaining why the
/// redirect happened (`auth=required|error`, `redirectTo`, `message`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectIntent {
    path: String,
    annotations: Vec<(String, String)>,
}

impl RedirectIntent {
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            annotations: Vec::new(),
        }
    }

    /// Home redirect carrying `auth=required` and the original destination.
    pub fn auth_required(redirect_to: &str) -> Self {
        Self::to("/")
            .with("auth", "required")
            .with("redirectTo", redirect_to)
    }

    /// Home redirect carrying `auth=error` and a human-readable reason.
    pub fn auth_error(message: &str) -> Self {
        Self::to("/").with("auth", "error").with("message", message)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.push((key.into(), value.into()));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Compose the absolute URL against a base origin. Annotation values are
    /// percent-encoded by the query serializer; the `message` text in
    /// particular may contain arbitrary characters.
    pub fn compose(&self, origin: &Url) -> Url {
        let mut url = origin.clone();
        url.set_path(&self.path);
        url.set_query(None);
        if !self.annotations.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.annotations {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}
