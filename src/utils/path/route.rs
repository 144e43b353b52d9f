//! Reference path utilities.
//!
//! References found in markup are `/`-separated URL paths, independent of the
//! host platform. These helpers work on them lexically, never touching disk.

/// Check if a link is external (has a URL scheme like http:, data:, etc.)
/// or is protocol-relative (`//cdn.example.com/x.js`).
///
/// A valid scheme must:
/// - Have at least 1 character before the colon
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
#[inline]
pub fn is_external_link(link: &str) -> bool {
    link.starts_with("//")
        || link.find(':').is_some_and(|pos| {
            pos > 0
                && link[..pos]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        })
}

/// Split a path into `(directory, file name)`.
///
/// The directory keeps its trailing slash so the two halves concatenate back
/// to the input.
///
/// ```ignore
/// assert_eq!(split_file_name("/img/a.png"), ("/img/", "a.png"));
/// assert_eq!(split_file_name("a.png"), ("", "a.png"));
/// ```
#[inline]
pub fn split_file_name(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => path.split_at(idx + 1),
        None => ("", path),
    }
}

/// Resolve a reference against the directory of the file containing it.
///
/// `base_dir` is relative to the source root (`""` for the root itself).
/// `/`-prefixed references resolve against the root. `.` and `..` segments are
/// applied lexically; returns `None` when the result would leave the root.
///
/// ```ignore
/// assert_eq!(resolve_relative("css", "../img/a.png").as_deref(), Some("img/a.png"));
/// assert_eq!(resolve_relative("css", "/img/a.png").as_deref(), Some("img/a.png"));
/// assert_eq!(resolve_relative("", "../a.png"), None);
/// ```
pub fn resolve_relative(base_dir: &str, reference: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();
    if !reference.starts_with('/') {
        segments.extend(base_dir.split('/').filter(|s| !s.is_empty()));
    }
    for segment in reference.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}
