//! Hash set resolving collisions with singly-linked chains

use std::iter::FusedIterator;

use log::{debug, trace};

use crate::{Key, TableError};

/// Bucket count of [`ChainingHashSet::default`]
const DEFAULT_CAPACITY: usize = 9;

/// A link in a collision chain
#[derive(Debug, Clone)]
struct ChainNode {
    /// The stored key
    key: Key,
    /// The next link, if any
    next: Option<Box<Self>>,
}

/// A fixed-capacity hash set whose buckets hold chains of keys.
///
/// Keys stay in insertion order inside their chain and are never duplicated. The bucket count
/// is chosen once at construction.
#[derive(Debug, Clone)]
pub struct ChainingHashSet {
    /// Head of the chain for every bucket
    buckets: Vec<Option<Box<ChainNode>>>,
    /// The bucket count as a signed modulus for hashing
    modulus: i64,
    /// Number of stored keys
    len: usize,
}

impl Default for ChainingHashSet {
    fn default() -> Self {
        Self { buckets: vec![None; DEFAULT_CAPACITY], modulus: 9, len: 0 }
    }
}

impl Drop for ChainingHashSet {
    fn drop(&mut self) {
        self.clear();
    }
}

impl Extend<Key> for ChainingHashSet {
    fn extend<T: IntoIterator<Item = Key>>(&mut self, iter: T) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl ChainingHashSet {
    /// Creates an empty table with `capacity` buckets.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidCapacity`] when `capacity` is zero or does not fit an `i64`.
    pub fn new(capacity: usize) -> Result<Self, TableError> {
        let modulus = i64::try_from(capacity)
            .ok()
            .filter(|&m| m >= 1)
            .ok_or(TableError::InvalidCapacity { capacity })?;

        Ok(Self { buckets: vec![None; capacity], modulus, len: 0 })
    }

    /// Returns the bucket of `key`: `key mod m`
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn hash(&self, key: Key) -> usize {
        // the remainder is below a modulus that was built from a usize
        key.rem_euclid(self.modulus).unsigned_abs() as usize
    }

    /// Appends `key` to the tail of its chain.
    ///
    /// Returns false, leaving the table untouched, if the key is already present.
    pub fn insert(&mut self, key: Key) -> bool {
        let index = self.hash(key);
        let Some(bucket) = self.buckets.get_mut(index) else {
            return false;
        };

        let mut tail = bucket;
        while let Some(node) = tail {
            if node.key == key {
                debug!("{key} already chained in bucket {index}");
                return false;
            }
            tail = &mut node.next;
        }
        *tail = Some(Box::new(ChainNode { key, next: None }));

        self.len = self.len.saturating_add(1);
        trace!("chained {key} in bucket {index}");
        true
    }

    /// Returns true if `key` is in its bucket's chain
    #[must_use]
    pub fn find(&self, key: Key) -> bool {
        self.chain(self.hash(key)).any(|stored| stored == key)
    }

    /// Unlinks the node holding `key`, splicing its predecessor to its successor.
    ///
    /// Returns false if the key was absent.
    pub fn remove(&mut self, key: Key) -> bool {
        let index = self.hash(key);
        let Some(bucket) = self.buckets.get_mut(index) else {
            return false;
        };

        let mut link = bucket;
        while link.as_ref().is_some_and(|node| node.key != key) {
            if let Some(node) = link {
                link = &mut node.next;
            }
        }

        let Some(node) = link.take() else {
            debug!("{key} not present in bucket {index}");
            return false;
        };
        *link = node.next;

        self.len = self.len.saturating_sub(1);
        trace!("unchained {key} from bucket {index}");
        true
    }

    /// Returns the keys of one bucket in chain order
    #[must_use]
    pub fn chain(&self, bucket: usize) -> Chain<'_> {
        Chain { next: self.buckets.get(bucket).and_then(|head| head.as_deref()) }
    }

    /// Returns the length of the longest chain
    #[must_use]
    pub fn longest_chain(&self) -> usize {
        (0..self.buckets.len()).map(|bucket| self.chain(bucket).count()).max().unwrap_or(0)
    }

    /// Returns an iterator over every key, bucket by bucket
    pub fn iter(&self) -> impl Iterator<Item = Key> {
        (0..self.buckets.len()).flat_map(move |bucket| self.chain(bucket))
    }

    /// Returns the number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no key is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the average chain length
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Removes every key, keeping the bucket count
    pub fn clear(&mut self) {
        // unlink nodes one at a time so a long chain does not recurse through Box drops
        for bucket in &mut self.buckets {
            let mut link = bucket.take();
            while let Some(mut node) = link {
                link = node.next.take();
            }
        }
        self.len = 0;
    }
}

/// Iterator over the keys of one collision chain
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    /// The node to yield next
    next: Option<&'a ChainNode>,
}

impl Iterator for Chain<'_> {
    type Item = Key;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some(node.key)
    }
}

impl FusedIterator for Chain<'_> {}
