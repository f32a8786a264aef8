//! Arena storage for tree nodes and the handles pointing into it.
//!
//! Nodes live in a single growable table and refer to each other through
//! [`NodeHandle`]s instead of references, so the parent back-link never forms
//! an ownership cycle. Released slots are chained into a free list and reused
//! by later allocations.
//!
//! Every slot carries a generation counter that is bumped when the slot is
//! released. A handle records the generation it was issued with, so a handle
//! to a removed node stops resolving instead of silently aliasing whatever
//! node reuses the slot.

use std::mem;

// =============================================================================
// NodeHandle
// =============================================================================

/// A stable reference to a node of an [`OrderedMap`](super::OrderedMap).
///
/// Handles are cheap to copy and stay valid as long as the node they were
/// issued for stays in the map. Deleting a key with two children keeps the
/// handle of the deleted position alive: it then holds the promoted
/// successor's entry.
///
/// # Examples
///
/// ```rust
/// use bst_map::ordered::OrderedMap;
///
/// let mut map: OrderedMap<i32, &str> = [(2, "two"), (1, "one")].into_iter().collect();
/// let handle = map.handle_of(&1).unwrap();
/// assert_eq!(map.entry_at(handle), Some((&1, &"one")));
///
/// map.delete(&1).unwrap();
/// assert_eq!(map.entry_at(handle), None);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeHandle {
    index: usize,
    generation: u32,
}

// =============================================================================
// Node
// =============================================================================

/// Which child edge of a node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Side {
    Left,
    Right,
}

/// A tree node. `left` and `right` own their subtrees, `parent` is only used
/// for navigation.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) left: Option<NodeHandle>,
    pub(crate) right: Option<NodeHandle>,
}

impl<K, V> Node<K, V> {
    /// Creates a node with no children.
    pub(crate) const fn leaf(key: K, value: V, parent: Option<NodeHandle>) -> Self {
        Self {
            key,
            value,
            parent,
            left: None,
            right: None,
        }
    }

    pub(crate) const fn child(&self, side: Side) -> Option<NodeHandle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) const fn set_child(&mut self, side: Side, child: Option<NodeHandle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Finds the edge holding `child` by handle identity.
    pub(crate) fn side_of(&self, child: NodeHandle) -> Option<Side> {
        if self.left == Some(child) {
            Some(Side::Left)
        } else if self.right == Some(child) {
            Some(Side::Right)
        } else {
            None
        }
    }
}

// =============================================================================
// NodeArena
// =============================================================================

#[derive(Clone, Debug)]
enum Slot<K, V> {
    Occupied {
        generation: u32,
        node: Node<K, V>,
    },
    Vacant {
        generation: u32,
        next_free: Option<usize>,
    },
}

/// A table of nodes addressed by [`NodeHandle`].
///
/// Uses free list allocation. Invariant: every index on the free list is in
/// bounds and names a `Vacant` slot.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Slot<K, V>>,
    first_free: Option<usize>,
    live: usize,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            first_free: None,
            live: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            first_free: None,
            live: 0,
        }
    }

    /// Number of nodes the table can hold without reallocating.
    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of live nodes.
    pub(crate) const fn len(&self) -> usize {
        self.live
    }

    /// Stores `node` and returns its handle, reusing a released slot when one
    /// is available.
    pub(crate) fn allocate(&mut self, node: Node<K, V>) -> NodeHandle {
        self.live += 1;
        match self.first_free {
            Some(index) => {
                let slot = &mut self.slots[index];
                let Slot::Vacant {
                    generation,
                    next_free,
                } = *slot
                else {
                    unreachable!("free list points at occupied slot {index}");
                };
                self.first_free = next_free;
                *slot = Slot::Occupied { generation, node };
                NodeHandle { index, generation }
            }
            None => {
                let index = self.slots.len();
                self.slots.push(Slot::Occupied {
                    generation: 0,
                    node,
                });
                NodeHandle {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Removes the node behind `handle` and returns it. The slot's generation
    /// is bumped so `handle` no longer resolves.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not resolve to a live node.
    pub(crate) fn release(&mut self, handle: NodeHandle) -> Node<K, V> {
        let vacant = Slot::Vacant {
            generation: handle.generation.wrapping_add(1),
            next_free: self.first_free,
        };
        match mem::replace(&mut self.slots[handle.index], vacant) {
            Slot::Occupied { generation, node } if generation == handle.generation => {
                self.first_free = Some(handle.index);
                self.live -= 1;
                node
            }
            _ => unreachable!("released stale node handle {handle:?}"),
        }
    }

    pub(crate) fn get(&self, handle: NodeHandle) -> Option<&Node<K, V>> {
        match self.slots.get(handle.index)? {
            Slot::Occupied { generation, node } if *generation == handle.generation => Some(node),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut Node<K, V>> {
        match self.slots.get_mut(handle.index)? {
            Slot::Occupied { generation, node } if *generation == handle.generation => Some(node),
            _ => None,
        }
    }

    /// Resolves a handle that the tree structure guarantees to be live.
    pub(crate) fn node(&self, handle: NodeHandle) -> &Node<K, V> {
        match self.get(handle) {
            Some(node) => node,
            None => unreachable!("dangling node handle {handle:?}"),
        }
    }

    pub(crate) fn node_mut(&mut self, handle: NodeHandle) -> &mut Node<K, V> {
        match self.get_mut(handle) {
            Some(node) => node,
            None => unreachable!("dangling node handle {handle:?}"),
        }
    }

    /// Drops every node. All slots go on the free list with bumped
    /// generations, so no handle issued before the call resolves afterwards.
    pub(crate) fn clear(&mut self) {
        let mut next_free = None;
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            let generation = match slot {
                Slot::Occupied { generation, .. } => generation.wrapping_add(1),
                Slot::Vacant { generation, .. } => *generation,
            };
            *slot = Slot::Vacant {
                generation,
                next_free,
            };
            next_free = Some(index);
        }
        self.first_free = next_free;
        self.live = 0;
    }

    // =========================================================================
    // Structural Navigation
    // =========================================================================

    /// The node reached by following left edges from `handle`: the minimum of
    /// its subtree.
    pub(crate) fn leftmost(&self, mut handle: NodeHandle) -> NodeHandle {
        while let Some(left) = self.node(handle).left {
            handle = left;
        }
        handle
    }

    /// The maximum of the subtree rooted at `handle`.
    pub(crate) fn rightmost(&self, mut handle: NodeHandle) -> NodeHandle {
        while let Some(right) = self.node(handle).right {
            handle = right;
        }
        handle
    }

    /// The in-order successor of `handle`.
    ///
    /// With a right subtree this is its leftmost node. Otherwise it is the
    /// first ancestor reached from a left edge. Only links are followed, keys
    /// are never compared.
    pub(crate) fn successor(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.neighbour(handle, Side::Right)
    }

    /// The in-order predecessor of `handle`, mirror of [`Self::successor`].
    pub(crate) fn predecessor(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.neighbour(handle, Side::Left)
    }

    fn neighbour(&self, handle: NodeHandle, toward: Side) -> Option<NodeHandle> {
        if let Some(child) = self.node(handle).child(toward) {
            return Some(match toward {
                Side::Right => self.leftmost(child),
                Side::Left => self.rightmost(child),
            });
        }
        let mut current = handle;
        let mut parent = self.node(handle).parent;
        while let Some(ancestor) = parent {
            let ancestor_node = self.node(ancestor);
            if ancestor_node.child(toward) != Some(current) {
                return Some(ancestor);
            }
            current = ancestor;
            parent = ancestor_node.parent;
        }
        None
    }
}

impl<K, V> Default for NodeArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
