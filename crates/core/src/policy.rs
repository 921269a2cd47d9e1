//! Route-level access policy.
//!
//! Every inbound path is classified by static prefix match against two
//! lists; the protected check runs before the auth-only check and the first
//! match wins. Sub-paths inherit their parent's classification. Evaluation
//! is a pure function of the path and principal presence, so the middleware
//! can call it after session resolution with no further I/O.

/// Classification of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Requires a principal.
    Protected,
    /// Reserved for unauthenticated users (sign-in entry points).
    AuthOnly,
    /// No constraint.
    Public,
}

/// Outcome of evaluating a request against the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Request proceeds unmodified.
    Allow,
    /// Protected path without a principal: redirect home with
    /// `auth=required` and the intended destination as `redirectTo`.
    RequireAuth { redirect_to: String },
    /// Auth-only path with a principal already present: redirect to the
    /// dashboard rather than re-showing a sign-in page.
    RedirectAuthenticated,
}

/// Prefix lists defining protected and auth-only route roots.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    protected: Vec<String>,
    auth_only: Vec<String>,
}

impl RoutePolicy {
    pub fn new(
        protected: impl IntoIterator<Item = impl Into<String>>,
        auth_only: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            protected: protected.into_iter().map(Into::into).collect(),
            auth_only: auth_only.into_iter().map(Into::into).collect(),
        }
    }

    /// Classify a path. Protected takes precedence; unmatched paths are
    /// public.
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.protected.iter().any(|p| path.starts_with(p.as_str())) {
            RouteClass::Protected
        } else if self.auth_only.iter().any(|p| path.starts_with(p.as_str())) {
            RouteClass::AuthOnly
        } else {
            RouteClass::Public
        }
    }

    /// Evaluate a request. Pure: identical inputs always yield identical
    /// decisions.
    pub fn evaluate(&self, path: &str, has_principal: bool) -> RouteDecision {
        match self.classify(path) {
            RouteClass::Protected if !has_principal => RouteDecision::RequireAuth {
                redirect_to: path.to_string(),
            },
            RouteClass::AuthOnly if has_principal => RouteDecision::RedirectAuthenticated,
            _ => RouteDecision::Allow,
        }
    }
}

impl Default for RoutePolicy {
    /// Product defaults: the dashboard tree is protected, the sign-in entry
    /// points live under `/auth`.
    fn default() -> Self {
        Self::new(["/dashboard"], ["/auth"])
    }
}
