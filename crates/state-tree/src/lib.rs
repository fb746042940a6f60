//! Path-addressable state container with copy-on-write updates and
//! per-path change subscriptions.
//!
//! The store holds an immutable tree of [`StateValue`]s rooted at a record.
//! Every mutation copies only the nodes on the path it touches; all other
//! subtrees are shared by reference with the previous tree, so reference
//! equality ([`StateValue::same`]) is a reliable change detector.
//!
//! Subscribers attach to a path and are notified whenever an ancestor, the
//! node itself, or a descendant is written. Notifications run top-down and
//! may be coalesced with [`Store::run_in_batch`].
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use state_tree::{path, StateValue, Store};
//! use std::sync::{Arc, Mutex};
//!
//! let mut store = Store::new(StateValue::from(json!({"todos": {}}))).unwrap();
//!
//! let events = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&events);
//! store.observe_changes(&path(["todos"]), &[], move |event| {
//!     sink.lock().unwrap().push(event.changed_paths);
//! });
//!
//! store.run_in_batch(|s| {
//!     s.set(&path(["todos", "1"]), StateValue::from("write docs")).unwrap();
//!     s.set(&path(["todos", "2"]), StateValue::from("ship")).unwrap();
//! });
//!
//! let events = events.lock().unwrap();
//! // initial delivery, then one coalesced batch event
//! assert_eq!(events.len(), 2);
//! assert_eq!(events[1], vec![path(["1"]), path(["2"])]);
//! ```

pub mod action;
pub mod error;
pub mod mutator;
pub mod notifier;
pub mod options;
pub mod store;
pub mod value;

pub use action::Action;
pub use error::StoreError;
pub use mutator::apply;
pub use notifier::{ChangeEvent, DetailLevel, Listener, SubscriptionId, SubscriptionIndex};
pub use options::{DetailPolicy, StoreOptions};
pub use store::Store;
pub use value::{Array, Record, StateValue};

pub use state_tree_path::{format_pointer, parse_pointer, path, Path};
