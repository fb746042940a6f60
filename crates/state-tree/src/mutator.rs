//! Copy-on-write application of [`Action`]s to a state tree.
//!
//! Only the nodes on the root-to-target path are cloned; every sibling
//! subtree of the result is shared by pointer with the input. A no-op
//! returns the input tree itself, so callers detect change with
//! [`StateValue::same`].

use std::sync::Arc;

use state_tree_path::{parse_array_index, MAX_ARRAY_GAP};

use crate::action::Action;
use crate::error::StoreError;
use crate::value::{Record, StateValue};

/// Applies `action` to `tree`, returning the new tree. The input is never
/// modified.
pub fn apply(tree: &StateValue, action: &Action) -> Result<StateValue, StoreError> {
    Ok(apply_action(tree, action)?.unwrap_or_else(|| tree.clone()))
}

/// `Ok(None)` means the action changed nothing.
fn apply_action(tree: &StateValue, action: &Action) -> Result<Option<StateValue>, StoreError> {
    match action {
        Action::Set {
            path,
            value: Some(value),
        } => set_at(tree, path, value),
        Action::Set { path, value: None } | Action::Delete { path } => delete_at(tree, path),
        Action::Batch { actions } => {
            let mut current: Option<StateValue> = None;
            for action in actions {
                let base = current.as_ref().unwrap_or(tree);
                if let Some(next) = apply_action(base, action)? {
                    current = Some(next);
                }
            }
            Ok(current)
        }
    }
}

fn set_at(
    tree: &StateValue,
    path: &[String],
    value: &StateValue,
) -> Result<Option<StateValue>, StoreError> {
    if path.is_empty() {
        if !value.is_record() {
            return Err(StoreError::InvalidRootType {
                found: value.type_label(),
            });
        }
        return Ok((!tree.same(value)).then(|| value.clone()));
    }
    set_in(Some(tree), path, 0, value)
}

/// `node` is the container at `path[..depth]`; the write targets
/// `path[depth]` inside it.
fn set_in(
    node: Option<&StateValue>,
    path: &[String],
    depth: usize,
    value: &StateValue,
) -> Result<Option<StateValue>, StoreError> {
    let key = &path[depth];
    match node {
        None => Ok(Some(fresh_chain(&path[depth..], value))),
        Some(StateValue::Record(record)) => {
            let current = record.get(key);
            let Some(next) = next_child(current, path, depth, value)? else {
                return Ok(None);
            };
            let mut record = (**record).clone();
            record.insert(key.clone(), next);
            Ok(Some(StateValue::Record(Arc::new(record))))
        }
        Some(StateValue::Array(items)) => {
            let index = parse_array_index(key).ok_or_else(|| StoreError::InvalidArrayIndex {
                path: path[..depth].to_vec(),
                index: key.clone(),
            })?;
            if index > items.len() + MAX_ARRAY_GAP {
                return Err(StoreError::InvalidArrayIndex {
                    path: path[..depth].to_vec(),
                    index: key.clone(),
                });
            }
            let current = items.get(index).and_then(Option::as_ref);
            let Some(next) = next_child(current, path, depth, value)? else {
                return Ok(None);
            };
            let mut items = (**items).clone();
            if index >= items.len() {
                items.resize(index + 1, None);
            }
            items[index] = Some(next);
            Ok(Some(StateValue::Array(Arc::new(items))))
        }
        Some(other) => Err(StoreError::NonRecordParent {
            path: path[..depth].to_vec(),
            found: other.type_label(),
        }),
    }
}

/// The replacement for the child at `path[depth]`, or `None` if it stays.
fn next_child(
    current: Option<&StateValue>,
    path: &[String],
    depth: usize,
    value: &StateValue,
) -> Result<Option<StateValue>, StoreError> {
    if depth + 1 == path.len() {
        if current.is_some_and(|c| c.same(value)) {
            return Ok(None);
        }
        return Ok(Some(value.clone()));
    }
    set_in(current, path, depth + 1, value)
}

/// Nested records leading to `value` for a path with no existing nodes.
fn fresh_chain(path: &[String], value: &StateValue) -> StateValue {
    path.iter().rev().fold(value.clone(), |child, key| {
        let mut record = Record::new();
        record.insert(key.clone(), child);
        StateValue::Record(Arc::new(record))
    })
}

fn delete_at(tree: &StateValue, path: &[String]) -> Result<Option<StateValue>, StoreError> {
    if path.is_empty() {
        return Err(StoreError::EmptyPath);
    }
    delete_in(tree, path, 0)
}

fn delete_in(
    node: &StateValue,
    path: &[String],
    depth: usize,
) -> Result<Option<StateValue>, StoreError> {
    let key = &path[depth];
    let is_leaf = depth + 1 == path.len();
    match node {
        StateValue::Record(record) => {
            if is_leaf {
                if !record.contains_key(key) {
                    return Ok(None);
                }
                let mut record = (**record).clone();
                record.shift_remove(key);
                return Ok(Some(StateValue::Record(Arc::new(record))));
            }
            let Some(child) = record.get(key) else {
                return Ok(None);
            };
            let Some(next) = delete_in(child, path, depth + 1)? else {
                return Ok(None);
            };
            let mut record = (**record).clone();
            record.insert(key.clone(), next);
            Ok(Some(StateValue::Record(Arc::new(record))))
        }
        StateValue::Array(items) => {
            if is_leaf {
                return Err(StoreError::ArrayElementDeleteUnsupported {
                    path: path.to_vec(),
                });
            }
            let index = parse_array_index(key).ok_or_else(|| StoreError::InvalidArrayIndex {
                path: path[..depth].to_vec(),
                index: key.clone(),
            })?;
            let Some(child) = items.get(index).and_then(Option::as_ref) else {
                return Ok(None);
            };
            let Some(next) = delete_in(child, path, depth + 1)? else {
                return Ok(None);
            };
            let mut items = (**items).clone();
            items[index] = Some(next);
            Ok(Some(StateValue::Array(Arc::new(items))))
        }
        other => Err(StoreError::NonRecordParent {
            path: path[..depth].to_vec(),
            found: other.type_label(),
        }),
    }
}
