use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest_derive::Arbitrary;

use crate::TrieMap;

/// Reference implementation the trie is checked against.
#[derive(Default)]
struct Model {
    map: BTreeMap<Vec<u8>, u64>,
}

impl Model {
    fn insert(&mut self, key: Vec<u8>, value: u64) {
        self.map.insert(key, value);
    }

    fn add(&mut self, key: Vec<u8>, value: u64) {
        *self.map.entry(key).or_insert(0) += value;
    }

    fn get(&self, key: &[u8]) -> Option<&u64> {
        self.map.get(key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

/// Actions to replay against both implementations.
#[derive(Arbitrary, Debug, Clone)]
enum Action {
    Insert(Key, u64),
    Add(Key, u64),
    Get(Key),
    Contains(Key),
    Prefix(Key),
}

/// Key wrapper with a strategy biased toward shared prefixes, so edge
/// splits and adaptive-table growth actually happen.
#[derive(Debug, Clone)]
struct Key(Vec<u8>);

impl Arbitrary for Key {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            // Empty key
            Just(Key(vec![])),
            // Arbitrary bytes
            prop::collection::vec(any::<u8>(), 1..24).prop_map(Key),
            // Tiny alphabet: forces deep shared prefixes and mid-label splits
            prop::collection::vec(prop_oneof![Just(b'a'), Just(b'b')], 1..12).prop_map(Key),
            // Path-shaped keys
            "[a-d]{1,4}(/[a-d]{1,4}){0,3}".prop_map(|s| Key(s.into_bytes())),
            // Shared stem with a numeric tail
            (0u32..16).prop_map(|n| Key(format!("stem/{}", n).into_bytes())),
        ]
        .boxed()
    }
}

/// Replays actions on the trie and the model, asserting agreement.
#[derive(Default)]
struct Test {
    trie: TrieMap<u64>,
    model: Model,
}

impl Test {
    fn execute(&mut self, action: Action) {
        match action {
            Action::Insert(key, value) => {
                self.trie.insert(&key.0, value);
                self.model.insert(key.0, value);
            }
            Action::Add(key, value) => {
                self.trie.add(&key.0, value);
                self.model.add(key.0, value);
            }
            Action::Get(key) => {
                assert_eq!(
                    self.trie.get(&key.0),
                    self.model.get(&key.0),
                    "get mismatch for key {:?}",
                    key.0
                );
            }
            Action::Contains(key) => {
                assert_eq!(
                    self.trie.contains(&key.0),
                    self.model.get(&key.0).is_some(),
                    "contains mismatch for key {:?}",
                    key.0
                );
            }
            Action::Prefix(key) => {
                let mut found = false;
                let mut got: Vec<_> = self
                    .trie
                    .find_prefix_exact(&key.0, &mut found)
                    .entries()
                    .map(|(k, &v)| (k, v))
                    .collect();
                got.sort();
                let expect: Vec<_> = self
                    .model
                    .map
                    .iter()
                    .filter(|(k, _)| k.starts_with(&key.0))
                    .map(|(k, &v)| (k.clone(), v))
                    .collect();
                assert_eq!(got, expect, "prefix mismatch for {:?}", key.0);
                assert_eq!(
                    found,
                    self.model.get(&key.0).is_some(),
                    "exact-match flag mismatch for {:?}",
                    key.0
                );
            }
        }
        assert_eq!(self.trie.len(), self.model.len(), "length mismatch");
    }

    fn check_final(&self) {
        let mut got: Vec<_> = self.trie.iter().map(|(k, &v)| (k, v)).collect();
        got.sort();
        let expect: Vec<_> = self.model.map.iter().map(|(k, &v)| (k.clone(), v)).collect();
        assert_eq!(got, expect, "full enumeration mismatch");
        let issues = self.trie.verify_invariants();
        assert!(issues.is_empty(), "invariant violations: {:?}", issues);
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn proptest_vs_btreemap(actions in prop::collection::vec(any::<Action>(), 1..64)) {
        let mut test = Test::default();
        for action in actions {
            test.execute(action);
        }
        test.check_final();
    }

    #[test]
    fn proptest_chunk_sizes_agree(
        keys in prop::collection::vec(any::<Key>(), 1..48),
    ) {
        let mut per_label: TrieMap<u64> = TrieMap::with_chunk_size(0);
        let mut pooled: TrieMap<u64> = TrieMap::with_chunk_size(1024);
        for (i, key) in keys.iter().enumerate() {
            per_label.insert(&key.0, i as u64);
            pooled.insert(&key.0, i as u64);
        }
        prop_assert_eq!(per_label.len(), pooled.len());
        for key in &keys {
            prop_assert_eq!(per_label.get(&key.0), pooled.get(&key.0));
        }
        let mut a: Vec<_> = per_label.iter().map(|(k, &v)| (k, v)).collect();
        let mut b: Vec<_> = pooled.iter().map(|(k, &v)| (k, v)).collect();
        a.sort();
        b.sort();
        prop_assert_eq!(a, b);
    }
}
