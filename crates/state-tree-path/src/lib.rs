//! Path utilities for nested state trees.
//!
//! A path is an ordered sequence of string segments that addresses a node by
//! walking records and arrays from the root. The empty path is the root
//! itself, and empty-string segments are valid keys.
//!
//! # Example
//!
//! ```
//! use state_tree_path::{dedupe_prefixes, is_prefix, parse_pointer, sort_paths};
//!
//! let a = parse_pointer("/a");
//! let ab = parse_pointer("/a/b");
//! assert!(is_prefix(&ab, &a));
//!
//! let sorted = sort_paths(&[ab.clone(), a.clone()]);
//! assert_eq!(sorted, vec![a.clone(), ab.clone()]);
//!
//! assert_eq!(dedupe_prefixes(&[ab, a.clone()]), vec![a]);
//! ```

use std::cmp::Ordering;

pub mod index;
pub mod pointer;

pub use index::{parse_array_index, MAX_ARRAY_GAP, MAX_ARRAY_INDEX};
pub use pointer::{escape_segment, format_pointer, parse_pointer, unescape_segment};

/// A single path segment.
pub type PathSegment = String;

/// A path from the root of a state tree.
pub type Path = Vec<PathSegment>;

/// Builds a [`Path`] from anything that yields string-like segments.
///
/// ```
/// use state_tree_path::path;
///
/// assert_eq!(path(["a", "b"]), vec!["a".to_string(), "b".to_string()]);
/// assert!(path(Vec::<String>::new()).is_empty());
/// ```
pub fn path<I, S>(segments: I) -> Path
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    segments.into_iter().map(Into::into).collect()
}

/// Check whether `prefix` is a prefix of `path`.
///
/// The empty path is a prefix of everything and every path is a prefix of
/// itself.
///
/// ```
/// use state_tree_path::{is_prefix, path};
///
/// assert!(is_prefix(&path(["a", "b"]), &path(["a"])));
/// assert!(is_prefix(&path(["a"]), &path(["a"])));
/// assert!(is_prefix(&path(["a"]), &[]));
/// assert!(!is_prefix(&path(["a"]), &path(["a", "b"])));
/// ```
pub fn is_prefix(path: &[String], prefix: &[String]) -> bool {
    prefix.len() <= path.len() && path[..prefix.len()] == *prefix
}

/// Check whether `prefix` is a prefix of `path` and strictly shorter.
pub fn is_strict_prefix(path: &[String], prefix: &[String]) -> bool {
    prefix.len() < path.len() && is_prefix(path, prefix)
}

/// Returns the part of `path` below `prefix`, or `None` when `prefix` is not
/// a prefix of `path`.
pub fn strip_prefix<'a>(path: &'a [String], prefix: &[String]) -> Option<&'a [String]> {
    if is_prefix(path, prefix) {
        Some(&path[prefix.len()..])
    } else {
        None
    }
}

/// Total order over paths: segment-wise string comparison, with a shorter
/// path ordered first when it is a prefix of the other.
pub fn compare_paths(a: &[String], b: &[String]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Returns a sorted copy of `paths`. The sort is stable.
pub fn sort_paths(paths: &[Path]) -> Vec<Path> {
    let mut out = paths.to_vec();
    out.sort_by(|a, b| compare_paths(a, b));
    out
}

/// Returns a sorted copy of `paths` with exact duplicates removed.
///
/// ```
/// use state_tree_path::{dedupe_exact, path};
///
/// let out = dedupe_exact(&[path(["b"]), path(["a"]), path(["b"])]);
/// assert_eq!(out, vec![path(["a"]), path(["b"])]);
/// ```
pub fn dedupe_exact(paths: &[Path]) -> Vec<Path> {
    let mut out = sort_paths(paths);
    out.dedup();
    out
}

/// Returns a sorted copy of `paths` keeping only the maximal prefixes: any
/// path that is a descendant of another path in the set is dropped.
///
/// If the root path is present the result is exactly `[[]]`.
///
/// ```
/// use state_tree_path::{dedupe_prefixes, path, Path};
///
/// let out = dedupe_prefixes(&[path(["a", "b", "c"]), path(["a", "b"]), path(["d"])]);
/// assert_eq!(out, vec![path(["a", "b"]), path(["d"])]);
///
/// let out = dedupe_prefixes(&[path(["x"]), Path::new()]);
/// assert_eq!(out, vec![Path::new()]);
/// ```
pub fn dedupe_prefixes(paths: &[Path]) -> Vec<Path> {
    let mut out: Vec<Path> = Vec::with_capacity(paths.len());
    // In sorted order a covering prefix is always the last kept path.
    for candidate in sort_paths(paths) {
        let covered = out
            .last()
            .is_some_and(|kept| is_prefix(&candidate, kept));
        if !covered {
            out.push(candidate);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_prefix() {
        let a = path(["a"]);
        let ab = path(["a", "b"]);
        let b = path(["b"]);

        assert!(is_prefix(&ab, &a));
        assert!(is_prefix(&ab, &ab));
        assert!(is_prefix(&ab, &[]));
        assert!(is_prefix(&[], &[]));
        assert!(!is_prefix(&a, &ab));
        assert!(!is_prefix(&ab, &b));
    }

    #[test]
    fn test_is_strict_prefix() {
        assert!(is_strict_prefix(&path(["a", "b"]), &path(["a"])));
        assert!(!is_strict_prefix(&path(["a"]), &path(["a"])));
    }

    #[test]
    fn test_strip_prefix() {
        let abc = path(["a", "b", "c"]);
        assert_eq!(strip_prefix(&abc, &path(["a"])), Some(&abc[1..]));
        assert_eq!(strip_prefix(&abc, &abc), Some(&abc[3..]));
        assert_eq!(strip_prefix(&abc, &path(["b"])), None);
    }

    #[test]
    fn test_empty_segment_is_a_key() {
        let p = path(["", "x"]);
        assert!(is_prefix(&p, &path([""])));
        assert!(!is_prefix(&p, &path(["x"])));
    }

    #[test]
    fn test_compare_paths() {
        assert_eq!(compare_paths(&path(["a"]), &path(["a", "b"])), Ordering::Less);
        assert_eq!(compare_paths(&path(["a", "b"]), &path(["b"])), Ordering::Less);
        assert_eq!(compare_paths(&path(["b"]), &path(["a", "z"])), Ordering::Greater);
        assert_eq!(compare_paths(&path(["a"]), &path(["a"])), Ordering::Equal);
        assert_eq!(compare_paths(&[], &path(["a"])), Ordering::Less);
    }

    #[test]
    fn test_sort_paths_does_not_mutate() {
        let input = vec![path(["b"]), path(["a", "c"]), path(["a"]), Path::new()];
        let sorted = sort_paths(&input);
        assert_eq!(
            sorted,
            vec![Path::new(), path(["a"]), path(["a", "c"]), path(["b"])]
        );
        assert_eq!(input[0], path(["b"]));
    }

    #[test]
    fn test_dedupe_exact_keeps_one() {
        let out = dedupe_exact(&[path(["a"]), path(["a"]), path(["a", "b"])]);
        assert_eq!(out, vec![path(["a"]), path(["a", "b"])]);
    }

    #[test]
    fn test_dedupe_prefixes() {
        let out = dedupe_prefixes(&[
            path(["a", "b"]),
            path(["a", "c", "d"]),
            path(["a"]),
            path(["ab"]),
        ]);
        assert_eq!(out, vec![path(["a"]), path(["ab"])]);
    }

    #[test]
    fn test_dedupe_prefixes_root_subsumes_all() {
        let out = dedupe_prefixes(&[path(["a"]), Path::new(), path(["b", "c"])]);
        assert_eq!(out, vec![Path::new()]);
    }

    #[test]
    fn test_dedupe_prefixes_empty_input() {
        assert!(dedupe_prefixes(&[]).is_empty());
    }
}
