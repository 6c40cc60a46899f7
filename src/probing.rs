//! Open-addressing hash set with interchangeable probe sequences

use log::{debug, trace};

use crate::{Key, TableError};

/// Default linear coefficient of quadratic probing
pub const DEFAULT_C1: i64 = 1;
/// Default quadratic coefficient of quadratic probing
pub const DEFAULT_C2: i64 = 3;

/// Collision-resolution rule used by a single insert.
///
/// Every strategy starts at `home = key mod m` and produces offsets of the form
/// `a * i + b * i^2` for the `i`-th attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeStrategy {
    /// Tries `(home + i) mod m`
    #[default]
    Linear,
    /// Tries `(home + c1 * i + c2 * i^2) mod m`.
    ///
    /// Not every `(c1, c2, m)` triple visits all slots. A sequence that cycles without
    /// reaching a free slot is reported as [`TableError::DegenerateProbeSequence`].
    Quadratic {
        /// Linear coefficient
        c1: i64,
        /// Quadratic coefficient
        c2: i64,
    },
    /// Tries `(home + i * step) mod m` with `step = 1 + key mod (m - 1)`
    DoubleHashing,
}

impl ProbeStrategy {
    /// Quadratic probing with the default constants
    #[must_use]
    pub const fn quadratic() -> Self {
        Self::Quadratic { c1: DEFAULT_C1, c2: DEFAULT_C2 }
    }
}

/// Where an insert stored its key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index of the slot now holding the key
    pub slot: usize,
    /// Number of slots inspected, including the one that was taken
    pub probes: usize,
}

/// Iterator over the slot indices a strategy visits for one key.
///
/// Yields exactly `m` indices: the offsets `a * i + b * i^2 (mod m)` repeat with period
/// dividing `m`, so nothing new is reachable after that.
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    /// Home slot of the key
    home: u128,
    /// Coefficient of `i`, reduced modulo `m`
    linear: u128,
    /// Coefficient of `i^2`, reduced modulo `m`
    quadratic: u128,
    /// Slot count of the table
    modulus: u128,
    /// Index of the next attempt
    attempt: u128,
}

#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
impl Iterator for ProbeSequence {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.attempt >= self.modulus {
            return None;
        }
        let m = self.modulus;
        let i = self.attempt;
        self.attempt += 1;

        // every operand is below m, so no intermediate product exceeds m^2
        let offset = (self.linear * i % m + self.quadratic * (i * i % m) % m) % m;
        // the result is below m, which itself came from a usize
        Some(((self.home + offset) % m) as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining =
            usize::try_from(self.modulus.saturating_sub(self.attempt)).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}

/// Reduces `value` into `0..modulus` using the Euclidean remainder.
///
/// `modulus` must be positive.
#[allow(clippy::cast_possible_truncation)]
fn reduce(value: i64, modulus: i64) -> usize {
    // the remainder is below a modulus that was built from a usize
    value.rem_euclid(modulus).unsigned_abs() as usize
}

/// A fixed-capacity hash set resolving collisions by open addressing.
///
/// The table never resizes and does not detect duplicate keys: inserting a key twice stores it
/// twice. Keys cannot be looked up or removed; the slot array is exposed for inspection.
#[derive(Debug, Clone)]
pub struct ProbingHashSet {
    /// The slots, each empty or holding one key
    slots: Box<[Option<Key>]>,
    /// The slot count as a signed modulus for hashing
    modulus: i64,
    /// Number of occupied slots
    len: usize,
}

impl ProbingHashSet {
    /// Creates an empty table with `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidCapacity`] when `capacity` is below two (double hashing
    /// reduces keys modulo `capacity - 1`) or does not fit an `i64`.
    pub fn new(capacity: usize) -> Result<Self, TableError> {
        let modulus = i64::try_from(capacity)
            .ok()
            .filter(|&m| m >= 2)
            .ok_or(TableError::InvalidCapacity { capacity })?;

        Ok(Self { slots: vec![None; capacity].into_boxed_slice(), modulus, len: 0 })
    }

    /// Primary hash: `key mod m`
    #[must_use]
    pub fn hash_default(&self, key: Key) -> usize {
        reduce(key, self.modulus)
    }

    /// Secondary hash used as the double-hashing step: `1 + key mod (m - 1)`
    #[must_use]
    pub fn hash_alternative(&self, key: Key) -> usize {
        reduce(key, self.modulus.saturating_sub(1)).saturating_add(1)
    }

    /// Returns the slots `strategy` visits for `key`, in order
    #[must_use]
    pub fn probe_sequence(&self, key: Key, strategy: ProbeStrategy) -> ProbeSequence {
        let (linear, quadratic) = match strategy {
            ProbeStrategy::Linear => (1, 0),
            ProbeStrategy::Quadratic { c1, c2 } => {
                (reduce(c1, self.modulus), reduce(c2, self.modulus))
            }
            ProbeStrategy::DoubleHashing => (self.hash_alternative(key), 0),
        };

        ProbeSequence {
            home: self.hash_default(key) as u128,
            linear: linear as u128,
            quadratic: quadratic as u128,
            modulus: self.slots.len() as u128,
            attempt: 0,
        }
    }

    /// Inserts `key` with linear probing.
    ///
    /// # Errors
    ///
    /// See [`ProbingHashSet::insert_with`].
    pub fn insert_linear(&mut self, key: Key) -> Result<Placement, TableError> {
        self.insert_with(key, ProbeStrategy::Linear)
    }

    /// Inserts `key` with quadratic probing using the constants `c1` and `c2`.
    ///
    /// # Errors
    ///
    /// See [`ProbingHashSet::insert_with`].
    pub fn insert_quadratic(
        &mut self,
        key: Key,
        c1: i64,
        c2: i64,
    ) -> Result<Placement, TableError> {
        self.insert_with(key, ProbeStrategy::Quadratic { c1, c2 })
    }

    /// Inserts `key` with double hashing.
    ///
    /// # Errors
    ///
    /// See [`ProbingHashSet::insert_with`].
    pub fn insert_double_hashing(&mut self, key: Key) -> Result<Placement, TableError> {
        self.insert_with(key, ProbeStrategy::DoubleHashing)
    }

    /// Stores `key` in the first empty slot of its probe sequence.
    ///
    /// # Errors
    ///
    /// - [`TableError::CapacityExhausted`] when every slot is occupied
    /// - [`TableError::DegenerateProbeSequence`] when the sequence ran through its whole period
    ///   without meeting one of the remaining free slots
    pub fn insert_with(
        &mut self,
        key: Key,
        strategy: ProbeStrategy,
    ) -> Result<Placement, TableError> {
        let capacity = self.slots.len();
        if self.len >= capacity {
            debug!("table of {capacity} slots is full, rejecting {key}");
            return Err(TableError::CapacityExhausted { key, capacity });
        }

        let mut probes: usize = 0;
        for slot in self.probe_sequence(key, strategy) {
            probes = probes.saturating_add(1);
            if let Some(entry) = self.slots.get_mut(slot).filter(|entry| entry.is_none()) {
                *entry = Some(key);
                self.len = self.len.saturating_add(1);
                trace!("placed {key} in slot {slot} after {probes} probes ({strategy:?})");
                return Ok(Placement { slot, probes });
            }
        }

        debug!(
            "{strategy:?} found no free slot for {key} in {probes} probes, {} slots free",
            capacity.saturating_sub(self.len)
        );
        Err(TableError::DegenerateProbeSequence { key, strategy, probes })
    }

    /// Returns the fixed number of slots
    #[must_use]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no slot is occupied
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the fraction of occupied slots
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.slots.len() as f64
    }

    /// Returns the raw slot array
    #[must_use]
    pub fn slots(&self) -> &[Option<Key>] {
        &self.slots
    }

    /// Returns the key stored in `slot`, if any
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<Key> {
        self.slots.get(slot).copied().flatten()
    }

    /// Returns an iterator over the occupied `(slot, key)` pairs in slot order
    pub fn iter(&self) -> impl Iterator<Item = (usize, Key)> {
        self.slots.iter().enumerate().filter_map(|(slot, key)| key.map(|key| (slot, key)))
    }

    /// Empties every slot
    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [Key; 9] = [10, 22, 31, 4, 15, 28, 17, 88, 59];

    fn filled(strategy: ProbeStrategy) -> ProbingHashSet {
        let mut table = ProbingHashSet::new(11).unwrap();
        for key in KEYS {
            table.insert_with(key, strategy).unwrap();
        }
        table
    }

    #[test]
    fn test_linear_probing_trace() {
        let table = filled(ProbeStrategy::Linear);
        assert_eq!(
            table.slots(),
            &[
                Some(22), Some(88), None, None, Some(4), Some(15),
                Some(28), Some(17), Some(59), Some(31), Some(10)
            ]
        );
    }

    #[test]
    fn test_quadratic_probing_trace() {
        let table = filled(ProbeStrategy::quadratic());
        assert_eq!(
            table.slots(),
            &[
                Some(22), None, Some(88), Some(17), Some(4), None,
                Some(28), Some(59), Some(15), Some(31), Some(10)
            ]
        );
    }

    #[test]
    fn test_double_hashing_trace() {
        let table = filled(ProbeStrategy::DoubleHashing);
        assert_eq!(
            table.slots(),
            &[
                Some(22), None, Some(59), Some(17), Some(4), Some(15),
                Some(28), Some(88), None, Some(31), Some(10)
            ]
        );
    }

    #[test]
    fn test_placement_reports_probes() {
        let mut table = ProbingHashSet::new(11).unwrap();
        assert_eq!(table.insert_linear(59), Ok(Placement { slot: 4, probes: 1 }));
        assert_eq!(table.insert_linear(4), Ok(Placement { slot: 5, probes: 2 }));
        assert_eq!(table.insert_quadratic(15, 1, 3), Ok(Placement { slot: 8, probes: 2 }));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_hash_functions() {
        let table = ProbingHashSet::new(11).unwrap();
        assert_eq!(table.hash_default(88), 0);
        assert_eq!(table.hash_alternative(88), 9);
        assert_eq!(table.hash_alternative(59), 10);
        // negative keys still land inside the table
        assert_eq!(table.hash_default(-1), 10);
        assert_eq!(table.hash_alternative(-1), 10);
    }

    #[test]
    fn test_probe_sequence_covers_table_once() {
        let table = ProbingHashSet::new(7).unwrap();
        let slots: Vec<_> = table.probe_sequence(5, ProbeStrategy::Linear).collect();
        assert_eq!(slots, vec![5, 6, 0, 1, 2, 3, 4]);

        let sequence = table.probe_sequence(5, ProbeStrategy::DoubleHashing);
        assert_eq!(sequence.len(), 7);
        let mut slots: Vec<_> = sequence.collect();
        slots.sort_unstable();
        assert_eq!(slots, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_duplicates_are_stored_twice() {
        let mut table = ProbingHashSet::new(5).unwrap();
        table.insert_linear(3).unwrap();
        table.insert_linear(3).unwrap();
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![(3, 3), (4, 3)]);
    }

    #[test]
    fn test_full_table_reports_capacity_exhausted() {
        let mut table = ProbingHashSet::new(5).unwrap();
        for key in 0..5 {
            assert!(table.insert_linear(key * 5).is_ok());
        }
        assert_eq!(table.load_factor(), 1.0);
        assert_eq!(
            table.insert_linear(42),
            Err(TableError::CapacityExhausted { key: 42, capacity: 5 })
        );
        assert_eq!(
            table.insert_double_hashing(42),
            Err(TableError::CapacityExhausted { key: 42, capacity: 5 })
        );
    }

    #[test]
    fn test_degenerate_quadratic_constants() {
        // offsets 2 * i^2 mod 4 only ever reach home and home + 2
        let mut table = ProbingHashSet::new(4).unwrap();
        table.insert_quadratic(0, 0, 2).unwrap();
        table.insert_quadratic(4, 0, 2).unwrap();
        let strategy = ProbeStrategy::Quadratic { c1: 0, c2: 2 };
        assert_eq!(
            table.insert_quadratic(8, 0, 2),
            Err(TableError::DegenerateProbeSequence { key: 8, strategy, probes: 4 })
        );
        // the table itself still has room
        assert_eq!(table.insert_linear(8), Ok(Placement { slot: 1, probes: 2 }));
    }

    #[test]
    fn test_quadratic_misses_free_slots_of_reference_table() {
        let mut table = filled(ProbeStrategy::Linear);
        // slots 2 and 3 are free but 7 + i + 3i^2 (mod 11) never reaches them
        assert!(matches!(
            table.insert_quadratic(7, 1, 3),
            Err(TableError::DegenerateProbeSequence { .. })
        ));
        assert_eq!(table.len(), KEYS.len());
    }

    #[test]
    fn test_double_hashing_with_shared_factor() {
        // m = 6, step for key 1 is 1 + 1 % 5 = 2, which only visits odd slots
        let mut table = ProbingHashSet::new(6).unwrap();
        for key in [1, 3, 5] {
            table.insert_linear(key).unwrap();
        }
        assert!(matches!(
            table.insert_double_hashing(1),
            Err(TableError::DegenerateProbeSequence { probes: 6, .. })
        ));
    }

    #[test]
    fn test_invalid_capacity() {
        let err = ProbingHashSet::new(0).unwrap_err();
        assert_eq!(err, TableError::InvalidCapacity { capacity: 0 });
        let err = ProbingHashSet::new(1).unwrap_err();
        assert_eq!(err, TableError::InvalidCapacity { capacity: 1 });
        assert!(ProbingHashSet::new(2).is_ok());
    }

    #[test]
    fn test_clear() {
        let mut table = filled(ProbeStrategy::DoubleHashing);
        assert_eq!(table.len(), 9);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.size(), 11);
        assert!(table.iter().next().is_none());
    }
}
