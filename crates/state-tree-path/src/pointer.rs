//! Pointer-style string form of a path (`/a/b/0`).
//!
//! Segments are escaped as in RFC 6901: `~` becomes `~0` and `/` becomes `~1`.

use crate::Path;

/// Unescapes a pointer segment.
///
/// ```
/// use state_tree_path::unescape_segment;
///
/// assert_eq!(unescape_segment("a~0b"), "a~b");
/// assert_eq!(unescape_segment("c~1d"), "c/d");
/// ```
pub fn unescape_segment(segment: &str) -> String {
    if !segment.contains('~') {
        return segment.to_string();
    }
    // ~1 first, otherwise "~01" would decode to "/"
    segment.replace("~1", "/").replace("~0", "~")
}

/// Escapes a pointer segment.
///
/// ```
/// use state_tree_path::escape_segment;
///
/// assert_eq!(escape_segment("a~b"), "a~0b");
/// assert_eq!(escape_segment("c/d"), "c~1d");
/// ```
pub fn escape_segment(segment: &str) -> String {
    if !segment.contains('/') && !segment.contains('~') {
        return segment.to_string();
    }
    segment.replace('~', "~0").replace('/', "~1")
}

/// Parses a pointer string into a path.
///
/// The empty string is the root path. A missing leading `/` is tolerated.
///
/// ```
/// use state_tree_path::parse_pointer;
///
/// assert!(parse_pointer("").is_empty());
/// assert_eq!(parse_pointer("/"), vec![""]);
/// assert_eq!(parse_pointer("/a/b"), vec!["a", "b"]);
/// assert_eq!(parse_pointer("a/b"), vec!["a", "b"]);
/// ```
pub fn parse_pointer(pointer: &str) -> Path {
    if pointer.is_empty() {
        return Path::new();
    }
    let body = pointer.strip_prefix('/').unwrap_or(pointer);
    body.split('/').map(unescape_segment).collect()
}

/// Formats a path as a pointer string. The root path formats as `""`.
///
/// ```
/// use state_tree_path::{format_pointer, path};
///
/// assert_eq!(format_pointer(&[]), "");
/// assert_eq!(format_pointer(&path(["a", "b/c"])), "/a/b~1c");
/// ```
pub fn format_pointer(path: &[String]) -> String {
    let mut out = String::new();
    for segment in path {
        out.push('/');
        out.push_str(&escape_segment(segment));
    }
    out
}
