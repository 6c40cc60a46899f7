//! Structural audit of a red-black tree

use thiserror::Error;

use super::{
    RedBlackTree,
    node::{Color, NodeId, node},
};
use crate::Key;

/// A broken red-black or search-tree property, found by [`RedBlackTree::check_invariants`]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root is red
    #[error("root {key} is red")]
    RedRoot {
        /// Key of the root
        key: Key,
    },
    /// A red node has a red child
    #[error("red node {key} has a red child")]
    RedChild {
        /// Key of the parent
        key: Key,
    },
    /// The two subtrees of a node have different black heights
    #[error("subtrees of {key} differ in black height: {left} on the left, {right} on the right")]
    BlackHeight {
        /// Key of the node
        key: Key,
        /// Black height of the left subtree
        left: usize,
        /// Black height of the right subtree
        right: usize,
    },
    /// A key sits on the wrong side of one of its ancestors
    #[error("{key} is out of search order")]
    OutOfOrder {
        /// The misplaced key
        key: Key,
    },
    /// A child does not point back at its parent
    #[error("child of {key} does not link back to it")]
    BrokenParentLink {
        /// Key of the parent
        key: Key,
    },
    /// The root's parent is not the sentinel
    #[error("root {key} has a parent")]
    RootHasParent {
        /// Key of the root
        key: Key,
    },
    /// The sentinel was recolored
    #[error("the sentinel is not black")]
    RedSentinel,
    /// The stored length disagrees with the reachable node count
    #[error("tree reports {reported} keys but {reachable} are reachable")]
    LengthMismatch {
        /// Value of `len()`
        reported: usize,
        /// Nodes reachable from the root
        reachable: usize,
    },
}

impl RedBlackTree {
    /// Audits the whole tree.
    ///
    /// Returns the black height of the root, counting the sentinel as one black node, so an
    /// empty tree has black height 1.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        if node(&self.nodes, NodeId::NIL).color != Color::Black {
            return Err(InvariantViolation::RedSentinel);
        }

        let root = node(&self.nodes, self.root);
        if !self.root.is_nil() {
            if root.color == Color::Red {
                return Err(InvariantViolation::RedRoot { key: root.key });
            }
            if !root.parent.is_nil() {
                return Err(InvariantViolation::RootHasParent { key: root.key });
            }
        }

        let mut reachable = 0;
        let black_height = self.check_subtree(self.root, None, None, &mut reachable)?;
        if reachable != self.len {
            return Err(InvariantViolation::LengthMismatch { reported: self.len, reachable });
        }

        Ok(black_height)
    }

    /// Checks the subtree under `id` against the key window `[lower, upper]` and returns its
    /// black height
    fn check_subtree(
        &self,
        id: NodeId,
        lower: Option<Key>,
        upper: Option<Key>,
        reachable: &mut usize,
    ) -> Result<usize, InvariantViolation> {
        if id.is_nil() {
            return Ok(1);
        }
        *reachable = reachable.saturating_add(1);

        let current = node(&self.nodes, id);
        let key = current.key;
        // equal keys may sit on either side once rotations have moved them
        if lower.is_some_and(|lower| key < lower) || upper.is_some_and(|upper| key > upper) {
            return Err(InvariantViolation::OutOfOrder { key });
        }

        for child in [current.left, current.right] {
            if child.is_nil() {
                continue;
            }
            let child = node(&self.nodes, child);
            if child.parent != id {
                return Err(InvariantViolation::BrokenParentLink { key });
            }
            if current.color == Color::Red && child.color == Color::Red {
                return Err(InvariantViolation::RedChild { key });
            }
        }

        let left = self.check_subtree(current.left, lower, Some(key), reachable)?;
        let right = self.check_subtree(current.right, Some(key), upper, reachable)?;
        if left != right {
            return Err(InvariantViolation::BlackHeight { key, left, right });
        }

        Ok(left.saturating_add(usize::from(current.color == Color::Black)))
    }
}
