//! Segment-keyed trie for indexing values by path.
//!
//! Every node may carry a value; nodes without a value exist only to connect
//! populated descendants and are pruned on delete. Traversals are pre-order
//! and visit children in sorted segment order, so ancestors are always seen
//! before their descendants.
//!
//! # Example
//!
//! ```
//! use path_trie::PathTrie;
//!
//! let p = |s: &[&str]| s.iter().map(|x| x.to_string()).collect::<Vec<_>>();
//!
//! let mut trie = PathTrie::new();
//! trie.set(&p(&["a", "b"]), 1);
//! trie.set(&p(&["a"]), 2);
//!
//! assert_eq!(trie.get(&p(&["a", "b"])), Some(&1));
//! assert!(trie.has_descendants(&p(&["a"])));
//!
//! let mut seen = Vec::new();
//! trie.visit(&[], |path, v| seen.push((path.to_vec(), *v)));
//! assert_eq!(seen, vec![(p(&["a"]), 2), (p(&["a", "b"]), 1)]);
//! ```

mod trie_node;

pub use trie_node::TrieNode;

#[derive(Clone, Debug)]
pub struct PathTrie<V> {
    root: TrieNode<V>,
    size: usize,
}

impl<V> PathTrie<V> {
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(None),
            size: 0,
        }
    }

    /// Number of populated nodes.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the node at `path`, populated or not.
    pub fn node(&self, path: &[String]) -> Option<&TrieNode<V>> {
        let mut cur = &self.root;
        for segment in path {
            cur = cur.children.get(segment)?;
        }
        Some(cur)
    }

    fn node_mut(&mut self, path: &[String]) -> Option<&mut TrieNode<V>> {
        let mut cur = &mut self.root;
        for segment in path {
            cur = cur.children.get_mut(segment)?;
        }
        Some(cur)
    }

    pub fn get(&self, path: &[String]) -> Option<&V> {
        self.node(path).and_then(|node| node.v.as_ref())
    }

    pub fn get_mut(&mut self, path: &[String]) -> Option<&mut V> {
        self.node_mut(path).and_then(|node| node.v.as_mut())
    }

    pub fn contains(&self, path: &[String]) -> bool {
        self.get(path).is_some()
    }

    /// Makes sure a node exists for every prefix of `path` and returns the
    /// node at `path`. Created nodes carry no value.
    pub fn fill_path(&mut self, path: &[String]) -> &mut TrieNode<V> {
        let mut cur = &mut self.root;
        for segment in path {
            cur = cur.children.entry(segment.clone()).or_default();
        }
        cur
    }

    /// Stores `value` at `path`, returning the previous value.
    pub fn set(&mut self, path: &[String], value: V) -> Option<V> {
        let prev = self.fill_path(path).v.replace(value);
        if prev.is_none() {
            self.size += 1;
        }
        prev
    }

    /// Returns the value at `path`, inserting one built by `init` first if
    /// the node is unpopulated.
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, path: &[String], init: F) -> &mut V {
        if !self.contains(path) {
            self.size += 1;
        }
        self.fill_path(path).v.get_or_insert_with(init)
    }

    /// Removes the value at `path`, pruning branches left without values.
    pub fn delete(&mut self, path: &[String]) -> Option<V> {
        let removed = remove_at(&mut self.root, path);
        if removed.is_some() {
            self.size -= 1;
        }
        removed
    }

    /// True if any node strictly below `path` carries a value.
    pub fn has_descendants(&self, path: &[String]) -> bool {
        self.node(path)
            .is_some_and(TrieNode::has_populated_descendant)
    }

    /// Pre-order walk over populated nodes at and below `start`.
    pub fn visit<F>(&self, start: &[String], mut f: F)
    where
        F: FnMut(&[String], &V),
    {
        self.visit_nodes(start, |path, v| {
            if let Some(v) = v {
                f(path, v);
            }
        });
    }

    /// Pre-order walk over every node at and below `start`, populated or not.
    pub fn visit_nodes<F>(&self, start: &[String], mut f: F)
    where
        F: FnMut(&[String], Option<&V>),
    {
        if let Some(node) = self.node(start) {
            let mut path = start.to_vec();
            walk(node, &mut path, &mut f);
        }
    }

    /// Removes every value, returning them in pre-order with their paths.
    pub fn drain(&mut self) -> Vec<(Vec<String>, V)> {
        let root = std::mem::take(&mut self.root);
        self.size = 0;
        let mut out = Vec::new();
        drain_into(root, &mut Vec::new(), &mut out);
        out
    }
}

impl<V> Default for PathTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn remove_at<V>(node: &mut TrieNode<V>, path: &[String]) -> Option<V> {
    let Some((head, rest)) = path.split_first() else {
        return node.v.take();
    };
    let child = node.children.get_mut(head)?;
    let removed = remove_at(child, rest);
    if child.is_vacant() {
        node.children.remove(head);
    }
    removed
}

fn walk<V, F>(node: &TrieNode<V>, path: &mut Vec<String>, f: &mut F)
where
    F: FnMut(&[String], Option<&V>),
{
    f(path, node.v.as_ref());
    for (segment, child) in &node.children {
        path.push(segment.clone());
        walk(child, path, f);
        path.pop();
    }
}

fn drain_into<V>(node: TrieNode<V>, path: &mut Vec<String>, out: &mut Vec<(Vec<String>, V)>) {
    if let Some(v) = node.v {
        out.push((path.clone(), v));
    }
    for (segment, child) in node.children {
        path.push(segment);
        drain_into(child, path, out);
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_set_get_delete() {
        let mut trie = PathTrie::new();
        assert!(trie.is_empty());
        assert_eq!(trie.set(&p(&["a", "b"]), "x"), None);
        assert_eq!(trie.set(&p(&["a", "b"]), "y"), Some("x"));
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.get(&p(&["a", "b"])), Some(&"y"));
        assert_eq!(trie.get(&p(&["a"])), None);
        assert_eq!(trie.delete(&p(&["a", "b"])), Some("y"));
        assert!(trie.is_empty());
        assert!(trie.node(&p(&["a"])).is_none());
    }

    #[test]
    fn test_root_value() {
        let mut trie = PathTrie::new();
        trie.set(&[], 7);
        assert_eq!(trie.get(&[]), Some(&7));
        assert_eq!(trie.delete(&[]), Some(7));
        assert_eq!(trie.delete(&[]), None);
    }

    #[test]
    fn test_delete_keeps_populated_ancestor_and_siblings() {
        let mut trie = PathTrie::new();
        trie.set(&p(&["a"]), 1);
        trie.set(&p(&["a", "b", "c"]), 2);
        trie.set(&p(&["a", "d"]), 3);
        trie.delete(&p(&["a", "b", "c"]));
        assert!(trie.node(&p(&["a", "b"])).is_none());
        assert_eq!(trie.get(&p(&["a"])), Some(&1));
        assert_eq!(trie.get(&p(&["a", "d"])), Some(&3));
        assert_eq!(trie.len(), 2);
    }

    #[test]
    fn test_has_descendants() {
        let mut trie = PathTrie::new();
        trie.set(&p(&["a"]), ());
        assert!(!trie.has_descendants(&p(&["a"])));
        assert!(trie.has_descendants(&[]));
        trie.fill_path(&p(&["a", "b", "c"]));
        assert!(!trie.has_descendants(&p(&["a"])));
        trie.set(&p(&["a", "b", "c"]), ());
        assert!(trie.has_descendants(&p(&["a"])));
        assert!(!trie.has_descendants(&p(&["z"])));
    }

    #[test]
    fn test_visit_is_pre_order_from_start() {
        let mut trie = PathTrie::new();
        trie.set(&p(&["b"]), 4);
        trie.set(&p(&["a", "b"]), 2);
        trie.set(&p(&["a"]), 1);
        trie.set(&p(&["a", "c"]), 3);

        let mut seen = Vec::new();
        trie.visit(&[], |path, v| seen.push((path.to_vec(), *v)));
        assert_eq!(
            seen,
            vec![
                (p(&["a"]), 1),
                (p(&["a", "b"]), 2),
                (p(&["a", "c"]), 3),
                (p(&["b"]), 4),
            ]
        );

        let mut below_a = Vec::new();
        trie.visit(&p(&["a"]), |path, _| below_a.push(path.to_vec()));
        assert_eq!(below_a, vec![p(&["a"]), p(&["a", "b"]), p(&["a", "c"])]);
    }

    #[test]
    fn test_visit_nodes_includes_unpopulated() {
        let mut trie: PathTrie<()> = PathTrie::new();
        trie.fill_path(&p(&["a", "b"]));
        let mut seen = Vec::new();
        trie.visit_nodes(&[], |path, v| seen.push((path.to_vec(), v.is_some())));
        assert_eq!(
            seen,
            vec![(p(&[]), false), (p(&["a"]), false), (p(&["a", "b"]), false)]
        );
    }

    #[test]
    fn test_get_or_insert_with() {
        let mut trie = PathTrie::new();
        *trie.get_or_insert_with(&p(&["x"]), || 0) += 1;
        *trie.get_or_insert_with(&p(&["x"]), || 100) += 1;
        assert_eq!(trie.get(&p(&["x"])), Some(&2));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_drain() {
        let mut trie = PathTrie::new();
        trie.set(&p(&["a", "b"]), 2);
        trie.set(&p(&["a"]), 1);
        let drained = trie.drain();
        assert_eq!(drained, vec![(p(&["a"]), 1), (p(&["a", "b"]), 2)]);
        assert!(trie.is_empty());
        assert!(trie.node(&p(&["a"])).is_none());
    }
}
