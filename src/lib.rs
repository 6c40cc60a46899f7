//! # Keyset
//!
//! Classic associative structures over integer keys.
//!
//! This crate provides three independent implementations:
//!
//! - `ProbingHashSet`: a fixed-capacity open-addressing table with linear, quadratic and
//!   double-hashing probe sequences
//! - `ChainingHashSet`: a fixed-capacity table resolving collisions with singly-linked chains
//! - `RedBlackTree`: a self-balancing binary search tree stored in an index arena with a shared
//!   black sentinel
//!
//! None of the tables resize. A probing insert that cannot find a free slot reports a
//! [`TableError`] instead of spinning.
//!
//! ## Open Addressing
//!
//! ```rust
//! use keyset::{ProbeStrategy, ProbingHashSet};
//!
//! let mut table = ProbingHashSet::new(11)?;
//! for key in [10, 22, 31, 4, 15, 28, 17, 88, 59] {
//!     table.insert_linear(key)?;
//! }
//!
//! // 88 collides with 22 at slot 0 and moves on to slot 1
//! assert_eq!(table.get(0), Some(22));
//! assert_eq!(table.get(1), Some(88));
//!
//! // Strategies can be mixed freely on one table
//! let placement = table.insert_with(3, ProbeStrategy::Quadratic { c1: 1, c2: 3 })?;
//! assert_eq!(table.get(placement.slot), Some(3));
//! # Ok::<(), keyset::TableError>(())
//! ```
//!
//! ## Separate Chaining
//!
//! ```rust
//! use keyset::ChainingHashSet;
//!
//! let mut table = ChainingHashSet::default();
//! for key in [5, 28, 19, 15, 20, 33, 12, 17, 10] {
//!     table.insert(key);
//! }
//!
//! assert!(table.find(15));
//! assert!(!table.find(25));
//!
//! table.remove(33);
//! assert!(!table.find(33));
//! ```
//!
//! ## Red-Black Tree
//!
//! ```rust
//! use keyset::{Color, RedBlackTree};
//!
//! let mut tree = RedBlackTree::new();
//! for key in [5, 16, 22, 45, 2, 10, 18, 30, 50, 12, 1] {
//!     tree.insert(key);
//! }
//!
//! assert_eq!(tree.keys().collect::<Vec<_>>(), vec![1, 2, 5, 10, 12, 16, 18, 22, 30, 45, 50]);
//! assert_eq!(tree.root().and_then(|root| tree.color(root)), Some(Color::Black));
//!
//! tree.delete(22);
//! assert!(tree.find(22).is_none());
//! assert!(tree.check_invariants().is_ok());
//! ```

/// Module implementing separate-chaining hash sets
mod chaining;
/// Error types shared by the hash sets
mod error;
/// Module implementing open-addressing hash sets
mod probing;
/// Module implementing the arena-backed red-black tree
mod red_black_tree;
/// Utility traits shared by the key sets
mod utils;

/// The key type stored by every structure in this crate
pub type Key = i64;

pub use chaining::{Chain, ChainingHashSet};
pub use error::TableError;
pub use probing::{DEFAULT_C1, DEFAULT_C2, Placement, ProbeSequence, ProbeStrategy, ProbingHashSet};
pub use red_black_tree::{Color, InvariantViolation, Iter as TreeIter, NodeId, RedBlackTree};
pub use utils::{KeySet, collect_keys};
