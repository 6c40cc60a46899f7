//! Utility traits shared by the key sets

use crate::{ChainingHashSet, Key, RedBlackTree};

/// Membership operations common to the structures that support lookups
pub trait KeySet {
    /// Adds `key`, returning false if the set rejected it
    fn insert_key(&mut self, key: Key) -> bool;

    /// Returns true if `key` is present
    fn contains(&self, key: Key) -> bool;

    /// Removes one occurrence of `key`, returning false if it was absent
    fn remove_key(&mut self, key: Key) -> bool;

    /// Returns every stored key as a Vec
    fn keys(&self) -> Vec<Key>;
}

impl KeySet for ChainingHashSet {
    fn insert_key(&mut self, key: Key) -> bool {
        self.insert(key)
    }

    fn contains(&self, key: Key) -> bool {
        self.find(key)
    }

    fn remove_key(&mut self, key: Key) -> bool {
        self.remove(key)
    }

    fn keys(&self) -> Vec<Key> {
        self.iter().collect()
    }
}

impl KeySet for RedBlackTree {
    fn insert_key(&mut self, key: Key) -> bool {
        self.insert(key);
        true
    }

    fn contains(&self, key: Key) -> bool {
        Self::contains(self, key)
    }

    fn remove_key(&mut self, key: Key) -> bool {
        self.delete(key)
    }

    fn keys(&self) -> Vec<Key> {
        Self::keys(self).collect()
    }
}

/// Builds a key set from an iterator of keys
pub fn collect_keys<S, I>(iter: I) -> S
where
    S: KeySet + Default,
    I: IntoIterator<Item = Key>,
{
    let mut set = S::default();

    for key in iter {
        set.insert_key(key);
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise<S: KeySet + Default>() -> S {
        let mut set: S = collect_keys([5, 28, 19, 15, 20, 33, 12, 17, 10]);
        assert!(set.contains(19));
        assert!(!set.contains(25));
        assert!(set.remove_key(19));
        assert!(!set.remove_key(19));
        assert!(!set.contains(19));
        set
    }

    #[test]
    fn test_chaining_set() {
        let set: ChainingHashSet = exercise();
        let mut keys = set.keys();
        keys.sort_unstable();
        assert_eq!(keys, vec![5, 10, 12, 15, 17, 20, 28, 33]);
        assert_eq!(KeySet::keys(&set).len(), set.len());
    }

    #[test]
    fn test_tree_set() {
        let set: RedBlackTree = exercise();
        assert_eq!(KeySet::keys(&set), vec![5, 10, 12, 15, 17, 20, 28, 33]);
        assert!(set.check_invariants().is_ok());
    }

    #[test]
    fn test_duplicate_policies_differ() {
        let mut chained: ChainingHashSet = collect_keys([1, 1, 1]);
        let mut tree: RedBlackTree = collect_keys([1, 1, 1]);
        assert_eq!(KeySet::keys(&chained), vec![1]);
        assert_eq!(KeySet::keys(&tree), vec![1, 1, 1]);

        assert!(!chained.insert_key(1));
        assert!(tree.insert_key(1));
    }
}
