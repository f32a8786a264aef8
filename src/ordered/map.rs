//! Ordered map backed by an unbalanced binary search tree.
//!
//! This module provides [`OrderedMap`], a mutable ordered map whose nodes
//! keep a link to their parent. Nodes are stored in an arena and addressed by
//! [`NodeHandle`], so the parent link is a plain index rather than a
//! reference.
//!
//! # Overview
//!
//! - O(h) get, insert, delete where h is the current height
//! - O(1) len and `is_empty`
//! - O(1) amortized per step in-order iteration, in both directions
//!
//! The tree is not rebalanced. Inserting keys in ascending order produces a
//! tree of height N, which is why every descent and traversal is iterative.
//!
//! # Deletion
//!
//! Deleting a node dispatches on its shape:
//!
//! 1. No children: the parent's edge to it is cleared.
//! 2. One child: the child takes its place under the parent. When the node
//!    is the root, the child's entry and subtrees move into the root slot
//!    instead, so the root handle stays stable.
//! 3. Two children: the in-order successor (leftmost node of the right
//!    subtree) is spliced out and its entry moves into the deleted node's
//!    slot, keeping that handle and position.
//!
//! # Examples
//!
//! ```rust
//! use bst_map::ordered::OrderedMap;
//!
//! let mut map = OrderedMap::new();
//! map.insert(3, "red");
//! map.insert(4, "blue");
//! map.insert(6, "yellow");
//! map.insert(2, "at");
//!
//! assert_eq!(map.get(&6), Some(&"yellow"));
//! let entries: Vec<(&i32, &&str)> = map.iter().collect();
//! assert_eq!(entries, vec![(&2, &"at"), (&3, &"red"), (&4, &"blue"), (&6, &"yellow")]);
//! ```

use super::arena::{Node, NodeArena, NodeHandle, Side};
use super::error::{InvariantViolation, KeyNotFound};
use super::iter::{IntoIter, Iter, PostOrder, PreOrder};
use smallvec::SmallVec;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::Index;

// =============================================================================
// OrderedMap Definition
// =============================================================================

/// An ordered map based on an unbalanced binary search tree.
///
/// Keys must implement `Ord`. Each key is stored once: inserting an existing
/// key replaces its value.
///
/// # Time Complexity
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `new`          | O(1)       |
/// | `get`          | O(h)       |
/// | `insert`       | O(h)       |
/// | `delete`       | O(h)       |
/// | `contains_key` | O(h)       |
/// | `iter`         | O(N)       |
/// | `len`          | O(1)       |
///
/// where h is the height of the tree, N in the worst case.
///
/// # Examples
///
/// ```rust
/// use bst_map::ordered::OrderedMap;
///
/// let mut map: OrderedMap<i32, &str> = [(5, "five"), (3, "three"), (8, "eight")]
///     .into_iter()
///     .collect();
///
/// assert_eq!(map.delete(&5), Ok("five"));
/// let keys: Vec<&i32> = map.keys().collect();
/// assert_eq!(keys, vec![&3, &8]);
/// ```
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    arena: NodeArena<K, V>,
    root: Option<NodeHandle>,
    /// Number of entries, maintained on every insert and delete
    length: usize,
}

static_assertions::assert_impl_all!(OrderedMap<i32, String>: Send, Sync, Clone);
static_assertions::assert_impl_all!(NodeHandle: Copy, Send, Sync);
static_assertions::assert_not_impl_any!(OrderedMap<std::rc::Rc<i32>, i32>: Send, Sync);

impl<K, V> OrderedMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bst_map::ordered::OrderedMap;
    ///
    /// let map: OrderedMap<i32, String> = OrderedMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
            length: 0,
        }
    }

    /// Creates an empty map with room for `capacity` entries before the node
    /// storage reallocates.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: NodeArena::with_capacity(capacity),
            root: None,
            length: 0,
        }
    }

    /// Returns how many entries the map can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Removes every entry. Handles issued before the call stop resolving.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.length = 0;
    }

    /// Returns an iterator over entries in ascending key order.
    ///
    /// The walk follows parent links, so it needs no auxiliary stack. Each
    /// call starts a fresh traversal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bst_map::ordered::OrderedMap;
    ///
    /// let map: OrderedMap<i32, char> = [(2, 'b'), (1, 'a'), (3, 'c')].into_iter().collect();
    ///
    /// let forward: Vec<(&i32, &char)> = map.iter().collect();
    /// assert_eq!(forward, vec![(&1, &'a'), (&2, &'b'), (&3, &'c')]);
    ///
    /// let backward: Vec<&i32> = map.iter().rev().map(|(key, _)| key).collect();
    /// assert_eq!(backward, vec![&3, &2, &1]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.root, self.length)
    }

    /// Returns an iterator over keys in ascending order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bst_map::ordered::OrderedMap;
    ///
    /// let map: OrderedMap<i32, i32> = [(1, 10), (2, 20), (3, 30)].into_iter().collect();
    /// let sum: i32 = map.values().sum();
    /// assert_eq!(sum, 60);
    /// ```
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|(_, value)| value)
    }

    /// Returns an iterator visiting each node before its left and right
    /// subtrees.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bst_map::ordered::OrderedMap;
    ///
    /// let map: OrderedMap<i32, ()> = [2, 1, 3].into_iter().map(|key| (key, ())).collect();
    /// let keys: Vec<&i32> = map.pre_order().map(|(key, _)| key).collect();
    /// assert_eq!(keys, vec![&2, &1, &3]);
    /// ```
    #[must_use]
    pub fn pre_order(&self) -> PreOrder<'_, K, V> {
        PreOrder::new(&self.arena, self.root, self.length)
    }

    /// Returns an iterator visiting each node after both of its subtrees.
    #[must_use]
    pub fn post_order(&self) -> PostOrder<'_, K, V> {
        PostOrder::new(&self.arena, self.root, self.length)
    }

    /// Returns the entry with the smallest key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bst_map::ordered::OrderedMap;
    ///
    /// let map: OrderedMap<i32, &str> = [(2, "two"), (1, "one")].into_iter().collect();
    /// assert_eq!(map.first_key_value(), Some((&1, &"one")));
    /// ```
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let node = self.arena.node(self.arena.leftmost(self.root?));
        Some((&node.key, &node.value))
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let node = self.arena.node(self.arena.rightmost(self.root?));
        Some((&node.key, &node.value))
    }

    /// Returns the number of nodes on the longest path from the root to a
    /// leaf, 0 for an empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bst_map::ordered::OrderedMap;
    ///
    /// // Ascending inserts degrade the tree into a chain.
    /// let map: OrderedMap<i32, ()> = (0..10).map(|key| (key, ())).collect();
    /// assert_eq!(map.height(), 10);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        let mut deepest = 0;
        let mut pending: SmallVec<[(NodeHandle, usize); 32]> =
            self.root.map(|root| (root, 1)).into_iter().collect();
        while let Some((handle, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            let node = self.arena.node(handle);
            pending.extend(
                [node.left, node.right]
                    .into_iter()
                    .flatten()
                    .map(|child| (child, depth + 1)),
            );
        }
        deepest
    }

    // =========================================================================
    // Handle Navigation
    // =========================================================================

    /// Returns the handle of the root node.
    #[must_use]
    pub const fn root_handle(&self) -> Option<NodeHandle> {
        self.root
    }

    /// Returns the entry stored at `handle`, or `None` if the handle no
    /// longer refers to a node of this map.
    #[must_use]
    pub fn entry_at(&self, handle: NodeHandle) -> Option<(&K, &V)> {
        self.arena
            .get(handle)
            .map(|node| (&node.key, &node.value))
    }

    /// Returns the parent of the node at `handle`.
    #[must_use]
    pub fn parent_of(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.arena.get(handle)?.parent
    }

    /// Returns the left child of the node at `handle`.
    #[must_use]
    pub fn left_of(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.arena.get(handle)?.left
    }

    /// Returns the right child of the node at `handle`.
    #[must_use]
    pub fn right_of(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.arena.get(handle)?.right
    }

    /// Returns the node holding the next larger key.
    ///
    /// Computed from the links alone: the leftmost node of the right subtree
    /// if there is one, otherwise the closest ancestor whose left subtree
    /// contains `handle`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bst_map::ordered::OrderedMap;
    ///
    /// let map: OrderedMap<i32, ()> = [5, 3, 8, 4].into_iter().map(|key| (key, ())).collect();
    /// let four = map.handle_of(&4).unwrap();
    /// let next = map.successor_of(four).unwrap();
    /// assert_eq!(map.entry_at(next), Some((&5, &())));
    /// ```
    #[must_use]
    pub fn successor_of(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.arena.get(handle)?;
        self.arena.successor(handle)
    }

    /// Returns the node holding the next smaller key.
    #[must_use]
    pub fn predecessor_of(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.arena.get(handle)?;
        self.arena.predecessor(handle)
    }

    /// Handles of every node in ascending key order.
    fn handles_in_order(&self) -> impl Iterator<Item = NodeHandle> {
        std::iter::successors(
            self.root.map(|root| self.arena.leftmost(root)),
            move |handle| self.arena.successor(*handle),
        )
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bst_map::ordered::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert("hello".to_string(), 42);
    ///
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|handle| &self.arena.node(handle).value)
    }

    /// Returns the stored key and the value corresponding to `key`.
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.arena.node(self.find(key)?);
        Some((&node.key, &node.value))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let handle = self.find(key)?;
        Some(&mut self.arena.node_mut(handle).value)
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns the handle of the node holding `key`.
    #[must_use]
    pub fn handle_of<Q>(&self, key: &Q) -> Option<NodeHandle>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key)
    }

    fn find<Q>(&self, key: &Q) -> Option<NodeHandle>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.arena.node(handle);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Inserts a key-value pair into the map.
    ///
    /// A new key becomes a leaf. If the key is already present its value is
    /// replaced in place and the old value is returned; the stored key and
    /// the node are kept.
    ///
    /// # Complexity
    ///
    /// O(h)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bst_map::ordered::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// assert_eq!(map.insert(1, "one"), None);
    /// assert_eq!(map.insert(1, "ONE"), Some("one"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let Some(mut current) = self.root else {
            self.root = Some(self.arena.allocate(Node::leaf(key, value, None)));
            self.length = 1;
            return None;
        };

        loop {
            let node = self.arena.node_mut(current);
            let side = match key.cmp(&node.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    tracing::trace!("insert replaced the value of an existing key");
                    return Some(mem::replace(&mut node.value, value));
                }
            };
            match node.child(side) {
                Some(child) => current = child,
                None => {
                    let leaf = self.arena.allocate(Node::leaf(key, value, Some(current)));
                    self.arena.node_mut(current).set_child(side, Some(leaf));
                    self.length += 1;
                    return None;
                }
            }
        }
    }

    /// Removes a key from the map, returning its value.
    ///
    /// # Errors
    ///
    /// Returns [`KeyNotFound`] if the key is absent. The map is left
    /// unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bst_map::ordered::{KeyNotFound, OrderedMap};
    ///
    /// let mut map: OrderedMap<i32, &str> = [(5, "five"), (3, "three"), (8, "eight")]
    ///     .into_iter()
    ///     .collect();
    /// let root = map.root_handle().unwrap();
    ///
    /// // 5 has two children: its successor 8 moves into the root node.
    /// assert_eq!(map.delete(&5), Ok("five"));
    /// assert_eq!(map.entry_at(root), Some((&8, &"eight")));
    ///
    /// assert_eq!(map.delete(&5), Err(KeyNotFound));
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn delete<Q>(&mut self, key: &Q) -> Result<V, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(target) = self.find(key) else {
            tracing::debug!(length = self.length, "delete missed an absent key");
            return Err(KeyNotFound);
        };
        let value = self.delete_node(target);
        self.length -= 1;
        Ok(value)
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// The `Option` flavored form of [`Self::delete`], for callers that
    /// expect the key may be missing.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.delete(key).ok()
    }

    /// Checks the structural invariants of the tree.
    ///
    /// Verifies that the root has no parent, that every child links back to
    /// the node owning it, that keys ascend in order, and that the size
    /// counter matches both the reachable and the allocated node count.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    #[doc(hidden)]
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if let Some(root) = self.root {
            let root_node = self
                .arena
                .get(root)
                .ok_or(InvariantViolation::DanglingHandle { handle: root })?;
            if let Some(parent) = root_node.parent {
                return Err(InvariantViolation::RootHasParent { root, parent });
            }
        }

        let mut reachable = 0;
        let mut pending: SmallVec<[NodeHandle; 32]> = self.root.into_iter().collect();
        while let Some(handle) = pending.pop() {
            let node = self
                .arena
                .get(handle)
                .ok_or(InvariantViolation::DanglingHandle { handle })?;
            reachable += 1;
            for child in [node.left, node.right].into_iter().flatten() {
                let child_node = self
                    .arena
                    .get(child)
                    .ok_or(InvariantViolation::DanglingHandle { handle: child })?;
                if child_node.parent != Some(handle) {
                    return Err(InvariantViolation::BrokenParentLink {
                        child,
                        owner: handle,
                        recorded: child_node.parent,
                    });
                }
                pending.push(child);
            }
        }
        if reachable != self.length || self.arena.len() != self.length {
            return Err(InvariantViolation::LengthMismatch {
                recorded: self.length,
                reachable,
                allocated: self.arena.len(),
            });
        }

        // Parent links are sound at this point, so the successor walk is too.
        let mut previous: Option<&K> = None;
        for handle in self.handles_in_order() {
            let key = &self.arena.node(handle).key;
            if previous.is_some_and(|previous| previous >= key) {
                return Err(InvariantViolation::OutOfOrder { handle });
            }
            previous = Some(key);
        }
        Ok(())
    }
}

// =============================================================================
// Structural Repair
// =============================================================================

impl<K, V> OrderedMap<K, V> {
    /// Unlinks the node at `target` and returns its value. Does not touch
    /// the size counter.
    fn delete_node(&mut self, target: NodeHandle) -> V {
        let node = self.arena.node(target);
        let (left, right, parent) = (node.left, node.right, node.parent);
        match (left, right) {
            (Some(_), Some(right)) => self.promote_successor(target, right),
            (Some(child), None) | (None, Some(child)) if parent.is_none() => {
                self.absorb_child(target, child)
            }
            (None, None) => {
                tracing::trace!(case = "leaf", "deleting node");
                self.splice_out(target).value
            }
            _ => {
                tracing::trace!(case = "splice", "deleting node");
                self.splice_out(target).value
            }
        }
    }

    /// Releases a node with at most one child and links its parent straight
    /// to that child. The parent's edge is found by handle identity.
    fn splice_out(&mut self, handle: NodeHandle) -> Node<K, V> {
        let node = self.arena.release(handle);
        debug_assert!(node.left.is_none() || node.right.is_none());

        let child = node.left.or(node.right);
        if let Some(child) = child {
            self.arena.node_mut(child).parent = node.parent;
        }
        match node.parent {
            None => self.root = child,
            Some(parent) => {
                let parent_node = self.arena.node_mut(parent);
                match parent_node.side_of(handle) {
                    Some(side) => parent_node.set_child(side, child),
                    None => unreachable!("node {handle:?} is not a child of its parent {parent:?}"),
                }
            }
        }
        node
    }

    /// Moves the only child of the root into the root slot. The root keeps
    /// its handle and adopts the child's subtrees.
    fn absorb_child(&mut self, root: NodeHandle, child: NodeHandle) -> V {
        tracing::trace!(case = "absorb_child", "deleting root with one child");
        let Node {
            key,
            value,
            left,
            right,
            ..
        } = self.arena.release(child);
        for grandchild in [left, right].into_iter().flatten() {
            self.arena.node_mut(grandchild).parent = Some(root);
        }

        let node = self.arena.node_mut(root);
        node.key = key;
        node.left = left;
        node.right = right;
        mem::replace(&mut node.value, value)
    }

    /// Splices out the leftmost node of the right subtree and moves its entry
    /// into `target`.
    fn promote_successor(&mut self, target: NodeHandle, right: NodeHandle) -> V {
        tracing::trace!(case = "promote_successor", "deleting node with two children");
        let successor = self.arena.leftmost(right);
        let Node { key, value, .. } = self.splice_out(successor);

        let node = self.arena.node_mut(target);
        node.key = key;
        mem::replace(&mut node.value, value)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for OrderedMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        // The successor walk climbs through already visited nodes, so the
        // order is fixed before any node is released.
        let order: Vec<NodeHandle> = self.handles_in_order().collect();
        let entries = order
            .into_iter()
            .map(|handle| {
                let node = self.arena.release(handle);
                (node.key, node.value)
            })
            .collect();
        IntoIter::new(entries)
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, Q, V> Index<&Q> for OrderedMap<K, V>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("{KeyNotFound}"),
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

/// Hashes the length, then each entry in key order, so maps holding the same
/// entries hash alike whatever their tree shape.
impl<K: Hash, V: Hash> Hash for OrderedMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for OrderedMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for OrderedMap<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct OrderedMapVisitor<K, V> {
    marker: std::marker::PhantomData<OrderedMap<K, V>>,
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for OrderedMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    type Value = OrderedMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = OrderedMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for OrderedMap<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(OrderedMapVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
