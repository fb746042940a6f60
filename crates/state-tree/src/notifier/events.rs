use serde::{Deserialize, Serialize};
use state_tree_path::Path;

use crate::value::StateValue;

/// Opaque handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// How much a subscriber needs to know about each change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    ValueOnly,
    WithOldValueAndPaths,
}

/// A change delivered to a detail-level subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// Current value at the subscribed path.
    pub value: Option<StateValue>,
    /// Value at the subscribed path before the mutation (or batch) began.
    pub old_value: Option<StateValue>,
    /// Changed sub-paths relative to the subscribed path, reduced to the
    /// shortest non-overlapping set. `[[]]` means the node was replaced as a
    /// whole; empty means it no longer exists.
    pub changed_paths: Vec<Path>,
}

impl ChangeEvent {
    pub(crate) fn initial(value: Option<StateValue>) -> Self {
        Self {
            value,
            old_value: None,
            changed_paths: Vec::new(),
        }
    }
}
