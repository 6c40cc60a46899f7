//! Arena nodes and the relation lookups the rebalancing code is written in

use crate::Key;

/// Node color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Freshly inserted nodes start red
    Red,
    /// The root and the sentinel are always black
    Black,
}

/// Handle of a node inside one tree's arena.
///
/// Handles stay attached to their key while the tree is rebalanced. A handle whose key was
/// deleted is rejected by the accessors until a later insert reuses its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(super) usize);

impl NodeId {
    /// The sentinel: black leaf marker and parent of the root
    pub const NIL: Self = Self(0);

    /// Returns true for the sentinel
    #[must_use]
    pub const fn is_nil(self) -> bool {
        self.0 == 0
    }
}

/// Child direction, also the direction a rotation turns in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Side {
    /// Towards smaller keys
    Left,
    /// Towards larger or equal keys
    Right,
}

impl Side {
    /// The mirrored direction
    pub(super) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// A tree node; links are arena handles, `NodeId::NIL` for none
#[derive(Debug, Clone)]
pub(super) struct Node {
    /// Stored key, meaningless for the sentinel and vacant slots
    pub(super) key: Key,
    /// Node color
    pub(super) color: Color,
    /// Parent link
    pub(super) parent: NodeId,
    /// Left child link
    pub(super) left: NodeId,
    /// Right child link
    pub(super) right: NodeId,
    /// Set while the slot sits on the free list
    pub(super) vacant: bool,
}

impl Node {
    /// A detached node with every link pointing at the sentinel
    pub(super) const fn detached(key: Key, color: Color) -> Self {
        Self {
            key,
            color,
            parent: NodeId::NIL,
            left: NodeId::NIL,
            right: NodeId::NIL,
            vacant: false,
        }
    }

    /// A released slot waiting on the free list
    pub(super) const fn vacant() -> Self {
        Self { vacant: true, ..Self::detached(0, Color::Black) }
    }
}

/// Looks up a node by handle.
///
/// Handles are only minted by the owning arena, so they are always in bounds.
#[allow(clippy::indexing_slicing)]
pub(super) fn node(nodes: &[Node], id: NodeId) -> &Node {
    &nodes[id.0]
}

/// Mutable counterpart of [`node`]
#[allow(clippy::indexing_slicing)]
pub(super) fn node_mut(nodes: &mut [Node], id: NodeId) -> &mut Node {
    &mut nodes[id.0]
}

/// Key stored at `id`
pub(super) fn key(nodes: &[Node], id: NodeId) -> Key {
    node(nodes, id).key
}

/// Color of `id`, black for the sentinel
pub(super) fn color(nodes: &[Node], id: NodeId) -> Color {
    node(nodes, id).color
}

/// Parent link of `id`
pub(super) fn parent(nodes: &[Node], id: NodeId) -> NodeId {
    node(nodes, id).parent
}

/// Child link of `id` on `side`
pub(super) fn child(nodes: &[Node], id: NodeId, side: Side) -> NodeId {
    let node = node(nodes, id);
    match side {
        Side::Left => node.left,
        Side::Right => node.right,
    }
}

/// Left child link of `id`
pub(super) fn left(nodes: &[Node], id: NodeId) -> NodeId {
    child(nodes, id, Side::Left)
}

/// Right child link of `id`
pub(super) fn right(nodes: &[Node], id: NodeId) -> NodeId {
    child(nodes, id, Side::Right)
}

/// Which child of its parent `id` is.
///
/// Also valid for the sentinel while a deletion has parked it under a parent: the other child
/// of that parent is then a real node, so the comparison is unambiguous.
pub(super) fn side_of(nodes: &[Node], id: NodeId) -> Side {
    if id == left(nodes, parent(nodes, id)) { Side::Left } else { Side::Right }
}

/// Parent of `id`'s parent
pub(super) fn grandparent(nodes: &[Node], id: NodeId) -> NodeId {
    parent(nodes, parent(nodes, id))
}

/// The other child of `id`'s parent
pub(super) fn sibling(nodes: &[Node], id: NodeId) -> NodeId {
    child(nodes, parent(nodes, id), side_of(nodes, id).opposite())
}

/// The sibling of `id`'s parent
pub(super) fn uncle(nodes: &[Node], id: NodeId) -> NodeId {
    sibling(nodes, parent(nodes, id))
}

/// Descends along `side` until the next step would hit the sentinel
pub(super) fn extreme(nodes: &[Node], mut id: NodeId, side: Side) -> NodeId {
    loop {
        let next = child(nodes, id, side);
        if next.is_nil() {
            return id;
        }
        id = next;
    }
}
