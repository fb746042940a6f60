use std::collections::BTreeMap;

use path_trie::PathTrie;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Set(Vec<String>, u32),
    Delete(Vec<String>),
    Fill(Vec<String>),
}

fn arb_path() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(vec!["", "a", "b", "c"]), 0..4)
        .prop_map(|segments| segments.into_iter().map(String::from).collect())
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (arb_path(), any::<u32>()).prop_map(|(p, v)| Op::Set(p, v)),
        arb_path().prop_map(Op::Delete),
        arb_path().prop_map(Op::Fill),
    ]
}

proptest! {
    #[test]
    fn behaves_like_a_sorted_map(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut trie = PathTrie::new();
        let mut model: BTreeMap<Vec<String>, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Set(path, v) => {
                    prop_assert_eq!(trie.set(&path, v), model.insert(path, v));
                }
                Op::Delete(path) => {
                    prop_assert_eq!(trie.delete(&path), model.remove(&path));
                }
                Op::Fill(path) => {
                    trie.fill_path(&path);
                }
            }
            prop_assert_eq!(trie.len(), model.len());
        }

        let mut visited = Vec::new();
        trie.visit(&[], |path, v| visited.push((path.to_vec(), *v)));
        let expected: Vec<_> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(visited, expected);

        for path in model.keys() {
            let has_below = model
                .keys()
                .any(|other| other.len() > path.len() && other[..path.len()] == path[..]);
            prop_assert_eq!(trie.has_descendants(path), has_below);
        }
    }
}
