//! Canonical path form.

/// Normalizes a URL path.
///
/// The result is lowercase, starts with exactly one `/`, has no repeated `/`
/// or `-`, and has no trailing `/` unless it is the root `/` itself. Total and
/// idempotent.
pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    out.push('/');
    let mut last = '/';

    for c in path.chars().flat_map(char::to_lowercase) {
        if (c == '/' || c == '-') && c == last {
            continue;
        }
        out.push(c);
        last = c;
    }

    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// Whether a path is already in canonical form.
pub fn is_normalized(path: &str) -> bool {
    normalize(path) == path
}
