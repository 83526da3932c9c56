//! Compact labels for sets of job ids.

use crate::job::JobId;

/// Formats ids the way the dashboard labels a group of jobs.
///
/// On the ascending-sorted ids: one id prints as-is, two or three are comma-joined, four or
/// more collapse to `first-last (count)` when consecutive and `first...last (count)`
/// otherwise. Empty input gives an empty string.
pub fn format_range(ids: &[JobId]) -> String {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();

    match sorted.as_slice() {
        [] => String::new(),
        [only] => only.to_string(),
        short if short.len() <= 3 => short
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        [first, .., last] => {
            let consecutive = sorted.windows(2).all(|w| w[0].checked_add(1) == Some(w[1]));
            let sep = if consecutive { "-" } else { "..." };
            format!("{first}{sep}{last} ({})", sorted.len())
        }
    }
}
