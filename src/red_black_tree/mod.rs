//! Red-black tree over integer keys.
//!
//! Nodes live in a `Vec` arena and refer to each other by index. Slot 0 holds the sentinel: a
//! single black node that stands in for every missing child and for the root's parent, so the
//! rebalancing code never has to special-case absent links.

mod invariants;
mod node;

use std::iter::FusedIterator;

use log::{debug, trace};

pub use invariants::InvariantViolation;
pub use node::{Color, NodeId};

use crate::Key;
use node::{
    Node, Side, child, color, extreme, grandparent, key, left, node, node_mut, parent, right,
    side_of, sibling, uncle,
};

/// A red-black tree of integer keys.
///
/// Equal keys are allowed; a repeated key is inserted to the right of its twin.
#[derive(Debug, Clone)]
pub struct RedBlackTree {
    /// Node arena, slot 0 is the sentinel
    nodes: Vec<Node>,
    /// Root handle, the sentinel when empty
    root: NodeId,
    /// Released slots available for reuse
    vacant: Vec<NodeId>,
    /// Number of keys stored
    len: usize,
}

impl Default for RedBlackTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<Key> for RedBlackTree {
    fn extend<T: IntoIterator<Item = Key>>(&mut self, iter: T) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl RedBlackTree {
    /// Creates an empty tree holding only its sentinel
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(0, Color::Black)],
            root: NodeId::NIL,
            vacant: Vec::new(),
            len: 0,
        }
    }

    /// Returns the number of keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no key
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the root, `None` when empty
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.live(self.root)
    }

    /// Returns the key of a node
    #[must_use]
    pub fn key(&self, id: NodeId) -> Option<Key> {
        self.live(id).map(|id| key(&self.nodes, id))
    }

    /// Returns the color of a node
    #[must_use]
    pub fn color(&self, id: NodeId) -> Option<Color> {
        self.live(id).map(|id| color(&self.nodes, id))
    }

    /// Returns the left child of a node
    #[must_use]
    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.live(id).and_then(|id| self.live(left(&self.nodes, id)))
    }

    /// Returns the right child of a node
    #[must_use]
    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.live(id).and_then(|id| self.live(right(&self.nodes, id)))
    }

    /// Returns the parent of a node, `None` for the root
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.live(id).and_then(|id| self.live(parent(&self.nodes, id)))
    }

    /// Filters out the sentinel, released slots and handles from another arena
    fn live(&self, id: NodeId) -> Option<NodeId> {
        let occupied = self.nodes.get(id.0).is_some_and(|node| !node.vacant);
        (!id.is_nil() && occupied).then_some(id)
    }

    /// Inserts `key` and rebalances, returning the new node.
    ///
    /// Keys equal to an existing one descend to the right.
    pub fn insert(&mut self, key: Key) -> NodeId {
        let mut parent = NodeId::NIL;
        let mut cursor = self.root;
        while !cursor.is_nil() {
            parent = cursor;
            cursor = if key < node::key(&self.nodes, cursor) {
                left(&self.nodes, cursor)
            } else {
                right(&self.nodes, cursor)
            };
        }

        let id = self.allocate(key);
        node_mut(&mut self.nodes, id).parent = parent;
        if parent.is_nil() {
            self.root = id;
        } else if key < node::key(&self.nodes, parent) {
            node_mut(&mut self.nodes, parent).left = id;
        } else {
            node_mut(&mut self.nodes, parent).right = id;
        }
        self.len = self.len.saturating_add(1);
        trace!("inserted {key} as {id:?}");

        self.insert_fixup(id);
        id
    }

    /// Returns a node holding `key`
    #[must_use]
    pub fn find(&self, key: Key) -> Option<NodeId> {
        let mut cursor = self.root;
        while !cursor.is_nil() {
            let current = node::key(&self.nodes, cursor);
            if key == current {
                return Some(cursor);
            }
            cursor =
                if key < current { left(&self.nodes, cursor) } else { right(&self.nodes, cursor) };
        }
        None
    }

    /// Returns true if some node holds `key`
    #[must_use]
    pub fn contains(&self, key: Key) -> bool {
        self.find(key).is_some()
    }

    /// Returns the leftmost node of the subtree rooted at `subtree`
    #[must_use]
    pub fn find_min(&self, subtree: NodeId) -> Option<NodeId> {
        self.live(subtree).map(|id| extreme(&self.nodes, id, Side::Left))
    }

    /// Returns the rightmost node of the subtree rooted at `subtree`
    #[must_use]
    pub fn find_max(&self, subtree: NodeId) -> Option<NodeId> {
        self.live(subtree).map(|id| extreme(&self.nodes, id, Side::Right))
    }

    /// Returns the smallest key
    #[must_use]
    pub fn min(&self) -> Option<Key> {
        self.find_min(self.root).map(|id| key(&self.nodes, id))
    }

    /// Returns the largest key
    #[must_use]
    pub fn max(&self) -> Option<Key> {
        self.find_max(self.root).map(|id| key(&self.nodes, id))
    }

    /// Removes one node holding `key` and rebalances.
    ///
    /// A node with two children is replaced by its in-order successor, which is moved into
    /// its position and takes over its color. Returns false if `key` is absent.
    pub fn delete(&mut self, key: Key) -> bool {
        let Some(target) = self.find(key) else {
            debug!("{key} not in tree, nothing to delete");
            return false;
        };

        let target_left = left(&self.nodes, target);
        let target_right = right(&self.nodes, target);

        // color of the node that physically leaves its position
        let mut removed_color = color(&self.nodes, target);
        let replacement;

        if target_left.is_nil() {
            replacement = target_right;
            self.transplant(target, target_right);
        } else if target_right.is_nil() {
            replacement = target_left;
            self.transplant(target, target_left);
        } else {
            let successor = extreme(&self.nodes, target_right, Side::Left);
            removed_color = color(&self.nodes, successor);
            replacement = right(&self.nodes, successor);

            if parent(&self.nodes, successor) == target {
                // the sentinel may land here and must know where it stands
                node_mut(&mut self.nodes, replacement).parent = successor;
            } else {
                self.transplant(successor, replacement);
                node_mut(&mut self.nodes, successor).right = target_right;
                node_mut(&mut self.nodes, target_right).parent = successor;
            }

            self.transplant(target, successor);
            node_mut(&mut self.nodes, successor).left = target_left;
            node_mut(&mut self.nodes, target_left).parent = successor;
            let target_color = color(&self.nodes, target);
            self.paint(successor, target_color);
        }

        if removed_color == Color::Black {
            self.delete_fixup(replacement);
        }
        node_mut(&mut self.nodes, NodeId::NIL).parent = NodeId::NIL;

        self.release(target);
        self.len = self.len.saturating_sub(1);
        trace!("deleted {key} from {target:?}");
        true
    }

    /// Removes every key, keeping only the sentinel
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.vacant.clear();
        self.root = NodeId::NIL;
        self.len = 0;
    }

    /// Returns the number of nodes on the longest root-to-leaf path
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height: usize = 0;
        let mut level = vec![self.root];
        while !level.is_empty() {
            level = level
                .into_iter()
                .filter(|id| !id.is_nil())
                .flat_map(|id| [left(&self.nodes, id), right(&self.nodes, id)])
                .collect();
            if !level.is_empty() {
                height = height.saturating_add(1);
            }
        }
        height
    }

    /// Returns an in-order iterator over `(key, color)` pairs
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter { tree: self, next: self.find_min(self.root).unwrap_or(NodeId::NIL) }
    }

    /// Returns the keys in non-decreasing order
    pub fn keys(&self) -> impl Iterator<Item = Key> {
        self.iter().map(|(key, _)| key)
    }

    /// Takes a slot for a new red node
    fn allocate(&mut self, key: Key) -> NodeId {
        let fresh = Node::detached(key, Color::Red);
        if let Some(id) = self.vacant.pop() {
            *node_mut(&mut self.nodes, id) = fresh;
            id
        } else {
            self.nodes.push(fresh);
            NodeId(self.nodes.len().saturating_sub(1))
        }
    }

    /// Returns an unlinked slot to the free list
    fn release(&mut self, id: NodeId) {
        *node_mut(&mut self.nodes, id) = Node::vacant();
        self.vacant.push(id);
    }

    /// Recolors a node; the sentinel stays black
    fn paint(&mut self, id: NodeId, color: Color) {
        if !id.is_nil() {
            node_mut(&mut self.nodes, id).color = color;
        }
    }

    /// Sets a child link of `id`, or the root link when `id` is the sentinel
    fn attach(&mut self, id: NodeId, side: Side, target: NodeId) {
        if id.is_nil() {
            self.root = target;
            return;
        }
        let node = node_mut(&mut self.nodes, id);
        match side {
            Side::Left => node.left = target,
            Side::Right => node.right = target,
        }
    }

    /// Puts `replacement` where `old` hangs from its parent
    fn transplant(&mut self, old: NodeId, replacement: NodeId) {
        let old_parent = parent(&self.nodes, old);
        let side = side_of(&self.nodes, old);
        self.attach(old_parent, side, replacement);
        node_mut(&mut self.nodes, replacement).parent = old_parent;
    }

    /// Rotates `pivot` down towards `direction`, promoting its child from the other side.
    ///
    /// A left rotation turns `x(a, y(b, c))` into `y(x(a, b), c)`.
    fn rotate(&mut self, pivot: NodeId, direction: Side) {
        let promoted = child(&self.nodes, pivot, direction.opposite());
        let inner = child(&self.nodes, promoted, direction);

        self.attach(pivot, direction.opposite(), inner);
        if !inner.is_nil() {
            node_mut(&mut self.nodes, inner).parent = pivot;
        }

        let pivot_parent = parent(&self.nodes, pivot);
        let side = side_of(&self.nodes, pivot);
        node_mut(&mut self.nodes, promoted).parent = pivot_parent;
        self.attach(pivot_parent, side, promoted);

        self.attach(promoted, direction, pivot);
        node_mut(&mut self.nodes, pivot).parent = promoted;
        trace!("rotated {pivot:?} {direction:?}, {promoted:?} promoted");
    }

    /// Restores the red rule after inserting the red node `id`
    fn insert_fixup(&mut self, mut id: NodeId) {
        while color(&self.nodes, parent(&self.nodes, id)) == Color::Red {
            let current_parent = parent(&self.nodes, id);
            let side = side_of(&self.nodes, current_parent);
            let current_uncle = uncle(&self.nodes, id);

            if color(&self.nodes, current_uncle) == Color::Red {
                let current_grandparent = grandparent(&self.nodes, id);
                self.paint(current_parent, Color::Black);
                self.paint(current_uncle, Color::Black);
                self.paint(current_grandparent, Color::Red);
                id = current_grandparent;
                continue;
            }

            if id == child(&self.nodes, current_parent, side.opposite()) {
                // inner grandchild: turn it outward first
                id = current_parent;
                self.rotate(id, side);
            }

            let outer_parent = parent(&self.nodes, id);
            let current_grandparent = grandparent(&self.nodes, id);
            self.paint(outer_parent, Color::Black);
            self.paint(current_grandparent, Color::Red);
            self.rotate(current_grandparent, side.opposite());
        }

        let root = self.root;
        self.paint(root, Color::Black);
    }

    /// Absorbs the extra black left at `id` by a deletion
    fn delete_fixup(&mut self, mut id: NodeId) {
        while id != self.root && color(&self.nodes, id) == Color::Black {
            let side = side_of(&self.nodes, id);
            let far = side.opposite();
            let mut current_sibling = sibling(&self.nodes, id);

            if color(&self.nodes, current_sibling) == Color::Red {
                let current_parent = parent(&self.nodes, id);
                self.paint(current_sibling, Color::Black);
                self.paint(current_parent, Color::Red);
                self.rotate(current_parent, side);
                current_sibling = sibling(&self.nodes, id);
            }

            let near_nephew = child(&self.nodes, current_sibling, side);
            let far_nephew = child(&self.nodes, current_sibling, far);
            if color(&self.nodes, near_nephew) == Color::Black
                && color(&self.nodes, far_nephew) == Color::Black
            {
                self.paint(current_sibling, Color::Red);
                id = parent(&self.nodes, id);
                continue;
            }

            if color(&self.nodes, far_nephew) == Color::Black {
                self.paint(near_nephew, Color::Black);
                self.paint(current_sibling, Color::Red);
                self.rotate(current_sibling, far);
                current_sibling = sibling(&self.nodes, id);
            }

            let current_parent = parent(&self.nodes, id);
            let parent_color = color(&self.nodes, current_parent);
            self.paint(current_sibling, parent_color);
            self.paint(current_parent, Color::Black);
            let far_nephew = child(&self.nodes, current_sibling, far);
            self.paint(far_nephew, Color::Black);
            self.rotate(current_parent, side);
            id = self.root;
        }

        self.paint(id, Color::Black);
    }

    /// In-order successor of a live node, the sentinel after the last one
    fn successor(&self, id: NodeId) -> NodeId {
        let right_child = right(&self.nodes, id);
        if !right_child.is_nil() {
            return extreme(&self.nodes, right_child, Side::Left);
        }

        let mut current = id;
        let mut ancestor = parent(&self.nodes, current);
        while !ancestor.is_nil() && current == right(&self.nodes, ancestor) {
            current = ancestor;
            ancestor = parent(&self.nodes, current);
        }
        ancestor
    }
}

/// In-order iterator over the `(key, color)` pairs of a [`RedBlackTree`]
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    /// The tree being walked
    tree: &'a RedBlackTree,
    /// The node to yield next, the sentinel once exhausted
    next: NodeId,
}

impl Iterator for Iter<'_> {
    type Item = (Key, Color);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_nil() {
            return None;
        }
        let current = node(&self.tree.nodes, self.next);
        let item = (current.key, current.color);
        self.next = self.tree.successor(self.next);
        Some(item)
    }
}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a RedBlackTree {
    type Item = (Key, Color);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
