//! Pluralization for summary lines.

/// Format a count with its noun: `1 file`, `0 files`, `3 warnings`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}
