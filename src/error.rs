//! Errors reported by the hash sets

use thiserror::Error;

use crate::{Key, ProbeStrategy};

/// Failures of hash set construction and open-addressing inserts
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// The requested slot count cannot back a table
    #[error("cannot build a table with {capacity} slots")]
    InvalidCapacity {
        /// The rejected slot count
        capacity: usize,
    },
    /// Every slot of the table is occupied
    #[error("cannot insert {key}: all {capacity} slots are occupied")]
    CapacityExhausted {
        /// The key that was being inserted
        key: Key,
        /// The fixed slot count of the table
        capacity: usize,
    },
    /// The probe sequence cycled through its whole period without meeting a free slot
    #[error(
        "cannot insert {key}: {strategy:?} revisits the same slots after {probes} probes while \
         free slots remain"
    )]
    DegenerateProbeSequence {
        /// The key that was being inserted
        key: Key,
        /// The strategy whose sequence failed to cover the table
        strategy: ProbeStrategy,
        /// How many slots were inspected before giving up
        probes: usize,
    },
}
