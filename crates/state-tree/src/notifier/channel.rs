use std::collections::BTreeMap;

use state_tree_path::Path;

use super::events::{ChangeEvent, DetailLevel, SubscriptionId};
use crate::options::DetailPolicy;
use crate::value::StateValue;

pub type ValueListener = Box<dyn FnMut(Option<StateValue>) + Send>;
pub type ChangeListener = Box<dyn FnMut(ChangeEvent) + Send>;

/// The callback end of a subscription.
pub enum Listener {
    Value(ValueListener),
    Changes(ChangeListener),
}

impl Listener {
    pub fn level(&self) -> DetailLevel {
        match self {
            Listener::Value(_) => DetailLevel::ValueOnly,
            Listener::Changes(_) => DetailLevel::WithOldValueAndPaths,
        }
    }

    fn deliver(&mut self, event: &ChangeEvent) {
        match self {
            Listener::Value(f) => f(event.value.clone()),
            Listener::Changes(f) => f(event.clone()),
        }
    }
}

pub(crate) struct Subscriber {
    listener: Listener,
    exclude: Vec<Path>,
}

impl Subscriber {
    pub(crate) fn new(listener: Listener, exclude: Vec<Path>) -> Self {
        Self { listener, exclude }
    }

    pub(crate) fn deliver(&mut self, event: &ChangeEvent) {
        self.listener.deliver(event);
    }

    /// True when every touched path is one of the excluded paths.
    fn ignores(&self, touched: &[Path]) -> bool {
        !self.exclude.is_empty() && touched.iter().all(|p| self.exclude.contains(p))
    }
}

/// Fan-out point for every subscriber at one exact path.
pub(crate) struct Channel {
    subscribers: BTreeMap<SubscriptionId, Subscriber>,
    detail_requested: bool,
    detail_subscribers: usize,
}

impl Channel {
    pub(crate) fn new() -> Self {
        Self {
            subscribers: BTreeMap::new(),
            detail_requested: false,
            detail_subscribers: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub(crate) fn needs_detail(&self, policy: DetailPolicy) -> bool {
        match policy {
            DetailPolicy::Sticky => self.detail_requested,
            DetailPolicy::Tracked => self.detail_subscribers > 0,
        }
    }

    pub(crate) fn attach(&mut self, id: SubscriptionId, subscriber: Subscriber) -> &mut Subscriber {
        if subscriber.listener.level() == DetailLevel::WithOldValueAndPaths {
            self.detail_requested = true;
            self.detail_subscribers += 1;
        }
        self.subscribers.entry(id).or_insert(subscriber)
    }

    pub(crate) fn detach(&mut self, id: SubscriptionId) -> bool {
        let Some(subscriber) = self.subscribers.remove(&id) else {
            return false;
        };
        if subscriber.listener.level() == DetailLevel::WithOldValueAndPaths {
            self.detail_subscribers -= 1;
        }
        true
    }

    /// Delivers `event` to every subscriber not filtering out `touched`.
    /// Returns the number of deliveries.
    pub(crate) fn emit(&mut self, event: &ChangeEvent, touched: &[Path]) -> usize {
        let mut delivered = 0;
        for subscriber in self.subscribers.values_mut() {
            if subscriber.ignores(touched) {
                continue;
            }
            subscriber.deliver(event);
            delivered += 1;
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changes() -> Listener {
        Listener::Changes(Box::new(|_: ChangeEvent| {}))
    }

    fn values() -> Listener {
        Listener::Value(Box::new(|_: Option<StateValue>| {}))
    }

    #[test]
    fn test_detail_flag_policies() {
        let mut channel = Channel::new();
        channel.attach(SubscriptionId(1), Subscriber::new(values(), vec![]));
        assert!(!channel.needs_detail(DetailPolicy::Sticky));
        assert!(!channel.needs_detail(DetailPolicy::Tracked));

        channel.attach(SubscriptionId(2), Subscriber::new(changes(), vec![]));
        assert!(channel.needs_detail(DetailPolicy::Sticky));
        assert!(channel.needs_detail(DetailPolicy::Tracked));

        assert!(channel.detach(SubscriptionId(2)));
        assert!(channel.needs_detail(DetailPolicy::Sticky));
        assert!(!channel.needs_detail(DetailPolicy::Tracked));
        assert!(!channel.detach(SubscriptionId(2)));
        assert_eq!(channel.len(), 1);
    }

    #[test]
    fn test_emit_skips_fully_excluded_changes() {
        let mut channel = Channel::new();
        let a = vec!["a".to_string()];
        let b = vec!["b".to_string()];
        channel.attach(SubscriptionId(1), Subscriber::new(values(), vec![a.clone()]));
        channel.attach(SubscriptionId(2), Subscriber::new(values(), vec![]));

        let event = ChangeEvent::initial(None);
        assert_eq!(channel.emit(&event, &[a.clone()]), 1);
        assert_eq!(channel.emit(&event, &[a, b]), 2);
    }
}
