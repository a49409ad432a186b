//! Joining backend-relative paths onto the configured base URL.

/// Join `relative` onto `base` with exactly one `/` between them.
///
/// An empty `relative` yields `base` without its trailing slashes.
pub fn join_base(base: &str, relative: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let relative = relative.trim().trim_start_matches('/');
    if relative.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{relative}")
    }
}

/// True when `s` starts with an `http://` or `https://` scheme.
pub fn is_http_url(s: &str) -> bool {
    let lower = s.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
