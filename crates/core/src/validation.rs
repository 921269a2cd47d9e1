/// Validates a post-login `next` path to prevent open redirects.
///
/// Returns `Some(path)` if the value is a safe relative path, `None`
/// otherwise.
///
/// # Security
///
/// The `next` query parameter is attacker-controllable, so it must:
/// - start with a single `/` (relative path only)
/// - not start with `//` (protocol-relative URLs like `//evil.com`)
/// - not contain control characters (header injection)
/// - not contain `://` (absolute URLs, `javascript:` and friends)
pub fn validate_next_path(path: &str) -> Option<&str> {
    if !path.starts_with('/') {
        return None;
    }

    if path.starts_with("//") {
        return None;
    }

    if path.chars().any(|c| c.is_control()) {
        return None;
    }

    if path.contains("://") {
        return None;
    }

    Some(path)
}
