use state_tree_path::{format_pointer, Path};
use thiserror::Error;

/// Errors raised by tree mutations. Every variant is detected before any
/// node is cloned, so a failed call leaves the tree untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("root state must be a record, got {found}")]
    InvalidRootType { found: &'static str },
    #[error("invalid array index {:?} under \"{}\"", .index, format_pointer(.path))]
    InvalidArrayIndex { path: Path, index: String },
    #[error("expected a record or array at \"{}\", found {}", format_pointer(.path), .found)]
    NonRecordParent { path: Path, found: &'static str },
    #[error("cannot delete the root path")]
    EmptyPath,
    #[error("cannot delete array element \"{}\"", format_pointer(.path))]
    ArrayElementDeleteUnsupported { path: Path },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = StoreError::NonRecordParent {
            path: vec!["a".to_string(), "b".to_string()],
            found: "null",
        };
        assert_eq!(
            err.to_string(),
            "expected a record or array at \"/a/b\", found null"
        );

        let err = StoreError::InvalidArrayIndex {
            path: vec!["list".to_string()],
            index: "-1".to_string(),
        };
        assert_eq!(err.to_string(), "invalid array index \"-1\" under \"/list\"");
    }
}
