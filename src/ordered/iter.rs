//! Iterators over an [`OrderedMap`](super::OrderedMap).

use super::arena::{NodeArena, NodeHandle};
use smallvec::SmallVec;
use std::iter::FusedIterator;

// =============================================================================
// In-Order Iterator
// =============================================================================

/// An iterator over the entries of an [`OrderedMap`](super::OrderedMap) in
/// ascending key order.
///
/// Steps between neighbours by following child and parent links, so it holds
/// only two handles regardless of the tree's height.
pub struct Iter<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    front: Option<NodeHandle>,
    back: Option<NodeHandle>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(arena: &'a NodeArena<K, V>, root: Option<NodeHandle>, length: usize) -> Self {
        Self {
            arena,
            front: root.map(|root| arena.leftmost(root)),
            back: root.map(|root| arena.rightmost(root)),
            remaining: length,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        // The two ends meet when `remaining` runs out, not when the handles
        // cross, so the count is checked first.
        if self.remaining == 0 {
            return None;
        }
        let arena = self.arena;
        let handle = self.front?;
        self.front = arena.successor(handle);
        self.remaining -= 1;
        let node = arena.node(handle);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let arena = self.arena;
        let handle = self.back?;
        self.back = arena.predecessor(handle);
        self.remaining -= 1;
        let node = arena.node(handle);
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

// =============================================================================
// Pre-Order and Post-Order Iterators
// =============================================================================

/// An iterator visiting each node before its subtrees, left subtree first.
pub struct PreOrder<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    pending: SmallVec<[NodeHandle; 32]>,
    remaining: usize,
}

impl<'a, K, V> PreOrder<'a, K, V> {
    pub(crate) fn new(arena: &'a NodeArena<K, V>, root: Option<NodeHandle>, length: usize) -> Self {
        Self {
            arena,
            pending: root.into_iter().collect(),
            remaining: length,
        }
    }
}

impl<'a, K, V> Iterator for PreOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        let handle = self.pending.pop()?;
        let node = arena.node(handle);
        self.pending.extend(node.right);
        self.pending.extend(node.left);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for PreOrder<'_, K, V> {}

impl<K, V> FusedIterator for PreOrder<'_, K, V> {}

/// An iterator visiting each node after its left and right subtrees.
pub struct PostOrder<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    /// Handles paired with whether their children were already scheduled
    pending: SmallVec<[(NodeHandle, bool); 32]>,
    remaining: usize,
}

impl<'a, K, V> PostOrder<'a, K, V> {
    pub(crate) fn new(arena: &'a NodeArena<K, V>, root: Option<NodeHandle>, length: usize) -> Self {
        Self {
            arena,
            pending: root.map(|root| (root, false)).into_iter().collect(),
            remaining: length,
        }
    }
}

impl<'a, K, V> Iterator for PostOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        loop {
            let (handle, expanded) = self.pending.pop()?;
            let node = arena.node(handle);
            if expanded {
                self.remaining -= 1;
                return Some((&node.key, &node.value));
            }
            self.pending.push((handle, true));
            self.pending.extend(node.right.map(|right| (right, false)));
            self.pending.extend(node.left.map(|left| (left, false)));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for PostOrder<'_, K, V> {}

impl<K, V> FusedIterator for PostOrder<'_, K, V> {}

// =============================================================================
// Owning Iterator
// =============================================================================

/// An owning iterator over the entries of an
/// [`OrderedMap`](super::OrderedMap) in ascending key order.
pub struct IntoIter<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(entries: Vec<(K, V)>) -> Self {
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

// =============================================================================
// Tests
// =============================================================================
