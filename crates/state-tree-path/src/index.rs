//! Array index parsing.

/// Exclusive upper bound for array indices. An index at or above this bound
/// would overflow the maximum array length.
pub const MAX_ARRAY_INDEX: usize = u32::MAX as usize;

/// Largest number of holes a single write may open past the end of an array.
/// Arrays are stored densely, so a write further out is rejected.
pub const MAX_ARRAY_GAP: usize = 1 << 16;

/// Parses a path segment as an array index.
///
/// Accepts canonical non-negative decimal integers only: no sign, no
/// leading zeros (except `"0"` itself), no fractional part, and strictly below
/// [`MAX_ARRAY_INDEX`].
///
/// ```
/// use state_tree_path::parse_array_index;
///
/// assert_eq!(parse_array_index("0"), Some(0));
/// assert_eq!(parse_array_index("12"), Some(12));
/// assert_eq!(parse_array_index("-1"), None);
/// assert_eq!(parse_array_index("01"), None);
/// assert_eq!(parse_array_index("1.5"), None);
/// assert_eq!(parse_array_index(""), None);
/// ```
pub fn parse_array_index(segment: &str) -> Option<usize> {
    let bytes = segment.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    let index: usize = segment.parse().ok()?;
    (index < MAX_ARRAY_INDEX).then_some(index)
}
