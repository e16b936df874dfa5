//! Append-only record of superseded full paths.
//!
//! The history feeds redirect generation downstream, so a recorded path is
//! never dropped. Moving an entry back to an earlier path keeps that path in
//! the list as well.

/// Returns the history after a resolution from `previous` to `new`.
///
/// An unchanged path leaves the history untouched. Otherwise a non-empty
/// previous path is appended unless it is already recorded.
pub fn record(previous: Option<&str>, new: &str, existing: &[String]) -> Vec<String> {
    let mut history = existing.to_vec();
    match previous {
        Some(prev) if prev != new && !prev.is_empty() => {
            if !history.iter().any(|p| p == prev) {
                history.push(prev.to_string());
            }
        }
        _ => {}
    }
    history
}
