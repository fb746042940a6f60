use std::collections::BTreeMap;

/// A trie node: an optional value plus children keyed by path segment.
///
/// Children are ordered, so a pre-order walk visits paths in sorted order.
#[derive(Clone, Debug)]
pub struct TrieNode<V> {
    pub v: Option<V>,
    pub children: BTreeMap<String, TrieNode<V>>,
}

impl<V> TrieNode<V> {
    pub fn new(v: Option<V>) -> Self {
        Self {
            v,
            children: BTreeMap::new(),
        }
    }

    /// A node that carries no value and has no children can be pruned.
    pub fn is_vacant(&self) -> bool {
        self.v.is_none() && self.children.is_empty()
    }

    /// True if any node strictly below this one carries a value.
    pub fn has_populated_descendant(&self) -> bool {
        self.children
            .values()
            .any(|child| child.v.is_some() || child.has_populated_descendant())
    }
}

impl<V> Default for TrieNode<V> {
    fn default() -> Self {
        Self::new(None)
    }
}
