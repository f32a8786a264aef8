//! Error types for the ordered map.
//!
//! [`KeyNotFound`] is the only error the map operations produce.
//! [`InvariantViolation`] is reported by
//! [`OrderedMap::check_invariants`](super::OrderedMap::check_invariants)
//! and describes the first structural defect found in a tree.

use super::arena::NodeHandle;

/// Returned by [`OrderedMap::delete`](super::OrderedMap::delete) when the
/// key is not present.
///
/// A failed deletion leaves the map untouched, so the caller decides whether
/// absence is expected or a bug.
///
/// # Examples
///
/// ```rust
/// use bst_map::ordered::{KeyNotFound, OrderedMap};
///
/// let mut map: OrderedMap<i32, &str> = OrderedMap::new();
/// assert_eq!(map.delete(&1), Err(KeyNotFound));
/// assert_eq!(format!("{}", KeyNotFound), "key not found in ordered map");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("key not found in ordered map")]
pub struct KeyNotFound;

/// A structural defect detected while validating a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// The root node points at a parent.
    #[error("root node {root:?} has parent {parent:?}")]
    RootHasParent {
        /// The root handle.
        root: NodeHandle,
        /// The parent recorded on the root.
        parent: NodeHandle,
    },

    /// A handle stored in the tree does not resolve to a live node.
    #[error("handle {handle:?} does not resolve to a live node")]
    DanglingHandle {
        /// The unresolvable handle.
        handle: NodeHandle,
    },

    /// A child's parent link does not point back at the node owning it.
    #[error("node {child:?} is owned by {owner:?} but its parent link is {recorded:?}")]
    BrokenParentLink {
        /// The child whose back-reference is wrong.
        child: NodeHandle,
        /// The node holding the child edge.
        owner: NodeHandle,
        /// The parent recorded on the child.
        recorded: Option<NodeHandle>,
    },

    /// An in-order walk met a key that is not greater than its predecessor.
    #[error("node {handle:?} breaks ascending key order")]
    OutOfOrder {
        /// The first node found out of order.
        handle: NodeHandle,
    },

    /// The size counter disagrees with the nodes reachable from the root.
    #[error("size counter is {recorded} but {reachable} nodes are reachable ({allocated} allocated)")]
    LengthMismatch {
        /// The maintained size counter.
        recorded: usize,
        /// Nodes reachable from the root.
        reachable: usize,
        /// Live slots in the arena.
        allocated: usize,
    },
}
