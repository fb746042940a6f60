//! The store facade: current root, mutations, subscriptions and batching.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver};

use state_tree_path::Path;
use tracing::{debug, instrument, trace};

use crate::action::Action;
use crate::error::StoreError;
use crate::mutator;
use crate::notifier::{ChangeEvent, Listener, SubscriptionId, SubscriptionIndex};
use crate::options::StoreOptions;
use crate::value::StateValue;

#[derive(Default)]
struct BatchState {
    depth: usize,
    actions: Vec<Action>,
    /// Root at the moment the outermost batch opened.
    snapshot: Option<StateValue>,
}

/// A path-addressable state container.
///
/// Every mutation is applied immediately. Outside a batch each successful
/// mutation notifies subscribers at once; inside [`Store::run_in_batch`]
/// notification is deferred until the outermost batch completes.
///
/// The store is single-threaded. To share it across threads wrap the whole
/// store in one `Mutex`.
///
/// ```
/// use serde_json::json;
/// use state_tree::{path, StateValue, Store};
/// use std::sync::{Arc, Mutex};
///
/// let mut store = Store::new(StateValue::from(json!({"user": {"name": "ann"}}))).unwrap();
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// store.observe(&path(["user", "name"]), &[], move |v| {
///     sink.lock().unwrap().push(v.map(|v| v.to_json()));
/// });
///
/// store.set(&path(["user", "name"]), StateValue::from("bob")).unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec![Some(json!("ann")), Some(json!("bob"))]);
/// ```
pub struct Store {
    root: StateValue,
    index: SubscriptionIndex,
    batch: BatchState,
}

impl Store {
    pub fn new(root: StateValue) -> Result<Self, StoreError> {
        Self::with_options(root, StoreOptions::default())
    }

    pub fn with_options(root: StateValue, options: StoreOptions) -> Result<Self, StoreError> {
        ensure_record(&root)?;
        Ok(Self {
            root,
            index: SubscriptionIndex::new(options.detail_policy),
            batch: BatchState::default(),
        })
    }

    /// The current root. Values obtained here are never mutated by the store.
    pub fn state(&self) -> &StateValue {
        &self.root
    }

    pub fn get(&self, path: &[String]) -> Option<&StateValue> {
        self.root.get_in(path)
    }

    /// Writes `value` at `path`. `None` deletes.
    pub fn set(
        &mut self,
        path: &[String],
        value: impl Into<Option<StateValue>>,
    ) -> Result<(), StoreError> {
        self.dispatch(Action::Set {
            path: path.to_vec(),
            value: value.into(),
        })
        .map(drop)
    }

    /// Like [`Store::set`], but `skip(old, new, path)` returning `true`
    /// suppresses the write entirely.
    pub fn set_with<F>(
        &mut self,
        path: &[String],
        value: impl Into<Option<StateValue>>,
        skip: F,
    ) -> Result<(), StoreError>
    where
        F: FnOnce(Option<&StateValue>, Option<&StateValue>, &[String]) -> bool,
    {
        let value = value.into();
        if skip(self.root.get_in(path), value.as_ref(), path) {
            trace!(?path, "write suppressed by comparator");
            return Ok(());
        }
        self.set(path, value)
    }

    pub fn delete(&mut self, path: &[String]) -> Result<(), StoreError> {
        self.dispatch(Action::Delete {
            path: path.to_vec(),
        })
        .map(drop)
    }

    /// Applies `action` and notifies (or defers, inside a batch).
    /// Returns whether the tree changed.
    pub fn dispatch(&mut self, action: Action) -> Result<bool, StoreError> {
        let next = mutator::apply(&self.root, &action)?;
        if next.same(&self.root) {
            trace!(?action, "no-op");
            return Ok(false);
        }
        let before = std::mem::replace(&mut self.root, next);
        if self.batch.depth > 0 {
            self.batch.actions.push(action);
        } else {
            self.index.publish(&before, &self.root, &action);
        }
        Ok(true)
    }

    /// Subscribes to the value at `path`. The current value is delivered
    /// before this returns. Changes whose touched paths all appear in
    /// `exclude` are not delivered.
    pub fn observe<F>(&mut self, path: &[String], exclude: &[Path], listener: F) -> SubscriptionId
    where
        F: FnMut(Option<StateValue>) + Send + 'static,
    {
        self.index.subscribe(
            &self.root,
            path.to_vec(),
            Listener::Value(Box::new(listener)),
            exclude.to_vec(),
        )
    }

    /// Subscribes to changes at `path` with old values and relative changed
    /// paths.
    pub fn observe_changes<F>(
        &mut self,
        path: &[String],
        exclude: &[Path],
        listener: F,
    ) -> SubscriptionId
    where
        F: FnMut(ChangeEvent) + Send + 'static,
    {
        self.index.subscribe(
            &self.root,
            path.to_vec(),
            Listener::Changes(Box::new(listener)),
            exclude.to_vec(),
        )
    }

    /// [`Store::observe`] delivering into a channel. The receiver disconnects
    /// once the subscription is removed or the store is reset.
    pub fn observe_stream(
        &mut self,
        path: &[String],
        exclude: &[Path],
    ) -> (SubscriptionId, Receiver<Option<StateValue>>) {
        let (tx, rx) = mpsc::channel();
        let id = self.observe(path, exclude, move |value| {
            // A dropped receiver just stops listening.
            let _ = tx.send(value);
        });
        (id, rx)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.index.unsubscribe(id)
    }

    /// Runs `body` with notification deferred. Nested calls join the
    /// outermost batch; one combined notification is published when it
    /// completes, even if `body` panics.
    #[instrument(level = "debug", skip_all, fields(depth = self.batch.depth))]
    pub fn run_in_batch<R, F>(&mut self, body: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        if self.batch.depth == 0 {
            self.batch.snapshot = Some(self.root.clone());
        }
        self.batch.depth += 1;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(&mut *self)));
        self.batch.depth -= 1;
        if self.batch.depth == 0 {
            self.flush_batch();
        }
        match outcome {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    pub fn in_batch(&self) -> bool {
        self.batch.depth > 0
    }

    fn flush_batch(&mut self) {
        let actions = std::mem::take(&mut self.batch.actions);
        let Some(before) = self.batch.snapshot.take() else {
            return;
        };
        if actions.is_empty() || before.same(&self.root) {
            return;
        }
        debug!(actions = actions.len(), "batch complete");
        self.index
            .publish(&before, &self.root, &Action::Batch { actions });
    }

    /// Replaces the root and drops every subscription without notifying.
    #[instrument(level = "debug", skip_all)]
    pub fn reset(&mut self, root: StateValue) -> Result<(), StoreError> {
        ensure_record(&root)?;
        let removed = self.index.teardown();
        self.root = root;
        if self.batch.depth > 0 {
            self.batch.actions.clear();
            self.batch.snapshot = Some(self.root.clone());
        }
        debug!(channels = removed, "store reset");
        Ok(())
    }

    pub fn channel_count(&self) -> usize {
        self.index.channel_count()
    }

    pub fn has_channel(&self, path: &[String]) -> bool {
        self.index.has_channel(path)
    }

    pub fn subscriber_count(&self, path: &[String]) -> usize {
        self.index.subscriber_count(path)
    }
}

fn ensure_record(root: &StateValue) -> Result<(), StoreError> {
    if root.is_record() {
        Ok(())
    } else {
        Err(StoreError::InvalidRootType {
            found: root.type_label(),
        })
    }
}
