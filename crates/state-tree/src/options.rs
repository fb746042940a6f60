use serde::{Deserialize, Serialize};

/// When a channel computes old values and changed paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailPolicy {
    /// Once any subscriber at a path asks for detail, that channel keeps
    /// computing it until the channel is torn down.
    #[default]
    Sticky,
    /// Detail is computed only while a detail subscriber is attached.
    Tracked,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    pub detail_policy: DetailPolicy,
}

impl StoreOptions {
    pub fn with_detail_policy(mut self, policy: DetailPolicy) -> Self {
        self.detail_policy = policy;
        self
    }
}
