//! Path-indexed subscriptions and change notification.
//!
//! Channels live in a [`PathTrie`] keyed by the subscribed path. A channel
//! exists exactly while at least one subscriber is attached at its path.
//!
//! For every published mutation the notifier:
//!
//! 1. collects the paths touched by the action (nested batches flattened),
//! 2. adds every subscribed path below a touched path, since overwriting a
//!    parent can change arbitrarily deep descendants,
//! 3. marks all of those paths and their ancestors in a scratch trie,
//! 4. walks the scratch trie in pre-order and emits one event per live
//!    channel, so `[]` fires before `["a"]`, which fires before `["a", "b"]`.

mod channel;
mod events;

use std::collections::HashMap;

use path_trie::PathTrie;
use state_tree_path::{dedupe_exact, dedupe_prefixes, is_strict_prefix, strip_prefix, Path};
use tracing::{debug, trace};

pub use channel::{ChangeListener, Listener, ValueListener};
pub use events::{ChangeEvent, DetailLevel, SubscriptionId};

use crate::action::Action;
use crate::options::DetailPolicy;
use crate::value::StateValue;
use channel::{Channel, Subscriber};

pub struct SubscriptionIndex {
    channels: PathTrie<Channel>,
    handles: HashMap<SubscriptionId, Path>,
    next_id: u64,
    policy: DetailPolicy,
}

impl SubscriptionIndex {
    pub fn new(policy: DetailPolicy) -> Self {
        Self {
            channels: PathTrie::new(),
            handles: HashMap::new(),
            next_id: 1,
            policy,
        }
    }

    /// Attaches `listener` at `path` and synchronously delivers the current
    /// value read from `root`.
    pub fn subscribe(
        &mut self,
        root: &StateValue,
        path: Path,
        listener: Listener,
        exclude: Vec<Path>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let level = listener.level();
        let channel = self.channels.get_or_insert_with(&path, Channel::new);
        let subscriber = channel.attach(id, Subscriber::new(listener, exclude));
        subscriber.deliver(&ChangeEvent::initial(root.get_in(&path).cloned()));

        trace!(?id, ?path, ?level, "subscribed");
        self.handles.insert(id, path);
        id
    }

    /// Detaches a subscriber. The channel is torn down with its last
    /// subscriber. Returns `false` for an unknown or already removed handle.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let Some(path) = self.handles.remove(&id) else {
            return false;
        };
        let Some(channel) = self.channels.get_mut(&path) else {
            return false;
        };
        let detached = channel.detach(id);
        if channel.is_empty() {
            self.channels.delete(&path);
            trace!(?id, ?path, "channel torn down");
        }
        detached
    }

    /// Tears down every channel without emitting events.
    /// Returns the number of channels removed.
    pub fn teardown(&mut self) -> usize {
        let removed = self.channels.drain().len();
        self.handles.clear();
        debug!(channels = removed, "subscription index torn down");
        removed
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn has_channel(&self, path: &[String]) -> bool {
        self.channels.contains(path)
    }

    pub fn subscriber_count(&self, path: &[String]) -> usize {
        self.channels.get(path).map_or(0, Channel::len)
    }

    /// Notifies every channel affected by `action`, which turned `before`
    /// into `after`.
    pub fn publish(&mut self, before: &StateValue, after: &StateValue, action: &Action) {
        let touched = dedupe_exact(&action.touched_paths());
        if touched.is_empty() || self.channels.is_empty() {
            return;
        }

        let mut targets = touched.clone();
        for path in &touched {
            self.channels
                .visit(path, |subscribed, _| targets.push(subscribed.to_vec()));
        }

        let mut scratch: PathTrie<()> = PathTrie::new();
        for path in dedupe_exact(&targets) {
            scratch.fill_path(&path);
        }
        let mut order = Vec::new();
        scratch.visit_nodes(&[], |path, _| order.push(path.to_vec()));

        let mut events = 0;
        let mut deliveries = 0;
        for path in order {
            let Some(channel) = self.channels.get_mut(&path) else {
                continue;
            };
            let value = after.get_in(&path).cloned();
            let event = if channel.needs_detail(self.policy) {
                let changed_paths = relative_changes(&touched, &path, value.is_some());
                ChangeEvent {
                    value,
                    old_value: before.get_in(&path).cloned(),
                    changed_paths,
                }
            } else {
                ChangeEvent {
                    value,
                    old_value: None,
                    changed_paths: Vec::new(),
                }
            };
            trace!(?path, changed = ?event.changed_paths, "emit");
            deliveries += channel.emit(&event, &touched);
            events += 1;
        }
        debug!(touched = touched.len(), events, deliveries, "published change");
    }
}

/// Changed paths relative to `subscribed`.
///
/// A touched ancestor means the node was replaced wholesale: `[[]]` if it
/// still exists, `[]` if it is gone. Otherwise the touched paths at or below
/// the node are stripped of the subscribed prefix and reduced to their
/// shortest non-overlapping set.
fn relative_changes(touched: &[Path], subscribed: &[String], present: bool) -> Vec<Path> {
    if touched.iter().any(|t| is_strict_prefix(subscribed, t)) {
        return if present { vec![Path::new()] } else { Vec::new() };
    }
    let below: Vec<Path> = touched
        .iter()
        .filter_map(|t| strip_prefix(t, subscribed))
        .map(<[String]>::to_vec)
        .collect();
    dedupe_prefixes(&below)
}
