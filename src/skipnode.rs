//! Nodes of the skipmap and the arena that stores them.
//!
//! Rather than heap-allocating every node and chaining raw pointers, all the
//! nodes of a map live in a single growable vector. A link to another node is
//! the index of that node's slot, so a node can be referenced from several
//! levels at once without any shared ownership. Slots freed by removals are
//! recycled before the vector is grown.

use std::{fmt, iter, ops};

/// A forward link: the slot of the next node, or `None` at the end of a level.
pub(crate) type Link = Option<usize>;

/// The position a search is at: `None` is the head, `Some(slot)` a node.
pub(crate) type Position = Option<usize>;

// ////////////////////////////////////////////////////////////////////////////
// SkipNode
// ////////////////////////////////////////////////////////////////////////////

/// A node holds one key-value pair and one forward link per level it
/// participates in.
///
/// A node of level `n` has `n` links, stored in a vector whose length never
/// changes after creation. `links[0]` is the successor in the full ordering,
/// the higher links skip ahead over nodes of lower levels.
#[derive(Clone)]
pub(crate) struct SkipNode<K, V> {
    pub key: K,
    pub value: V,
    pub links: Vec<Link>,
}

impl<K, V> SkipNode<K, V> {
    /// Create a new node spanning `level` levels. All links start empty.
    pub fn new(key: K, value: V, level: usize) -> Self {
        SkipNode {
            key,
            value,
            links: iter::repeat_n(None, level).collect(),
        }
    }

    /// How many levels the node participates in.
    #[inline]
    pub fn level(&self) -> usize {
        self.links.len()
    }

    pub fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SkipNode<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}: {:?}; {}]", self.key, self.value, self.level())
    }
}

// ////////////////////////////////////////////////////////////////////////////
// NodeArena
// ////////////////////////////////////////////////////////////////////////////

/// Owns every node of a map along with the head tower.
///
/// The head is not a node: it holds no key nor value and is only a tower of
/// `height` links. It is always present and never counted.
#[derive(Clone)]
pub(crate) struct NodeArena<K, V> {
    head: Vec<Link>,
    slots: Vec<Option<SkipNode<K, V>>>,
    free: Vec<usize>,
}

impl<K, V> NodeArena<K, V> {
    /// Create an empty arena whose head tower has `height` levels.
    pub fn new(height: usize) -> Self {
        NodeArena {
            head: iter::repeat_n(None, height).collect(),
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Create an empty arena with room for `capacity` nodes.
    pub fn with_capacity(height: usize, capacity: usize) -> Self {
        NodeArena {
            head: iter::repeat_n(None, height).collect(),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// The number of levels of the head tower.
    #[inline]
    pub fn height(&self) -> usize {
        self.head.len()
    }

    /// The number of nodes currently stored.
    #[inline]
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// The number of slots, occupied or not.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Mutable references to every slot, indexed by slot.
    pub fn slots_mut(&mut self) -> Vec<Option<&mut SkipNode<K, V>>> {
        self.slots.iter_mut().map(Option::as_mut).collect()
    }

    /// Drops every node and empties the head tower.
    pub fn clear(&mut self) {
        self.head.fill(None);
        self.slots.clear();
        self.free.clear();
    }

    // /////////////////////////////
    // Slot management
    // /////////////////////////////

    /// Store `node`, returning the slot it now occupies.
    pub fn alloc(&mut self, node: SkipNode<K, V>) -> usize {
        if let Some(slot) = self.free.pop() {
            self.slots[slot] = Some(node);
            slot
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        }
    }

    /// Take the node out of `slot` and make the slot available again.
    ///
    /// The caller must have unlinked the node from every level beforehand.
    pub fn release(&mut self, slot: usize) -> SkipNode<K, V> {
        match self.slots.get_mut(slot).and_then(Option::take) {
            Some(node) => {
                self.free.push(slot);
                node
            }
            None => unreachable!("released slot {slot} is not occupied"),
        }
    }

    // /////////////////////////////
    // Link manipulation
    // /////////////////////////////

    /// The links of the head (`None`) or of the node in the given slot.
    #[inline]
    pub fn links(&self, at: Position) -> &[Link] {
        match at {
            None => &self.head,
            Some(slot) => &self[slot].links,
        }
    }

    /// The successor of `at` on `level`.
    #[inline]
    pub fn next(&self, at: Position, level: usize) -> Link {
        self.links(at)[level]
    }

    /// Point the link of `at` on `level` to `to`.
    #[inline]
    pub fn set_next(&mut self, at: Position, level: usize, to: Link) {
        match at {
            None => self.head[level] = to,
            Some(slot) => self[slot].links[level] = to,
        }
    }

    /// Walk along `level` starting at `from`, for as long as `advance` accepts
    /// the key of the next node. Returns the last position reached.
    #[inline]
    pub fn advance_while_at_level<F>(&self, from: Position, level: usize, mut advance: F) -> Position
    where
        F: FnMut(&K) -> bool,
    {
        let mut current = from;
        while let Some(next) = self.next(current, level) {
            if !advance(&self[next].key) {
                break;
            }
            current = Some(next);
        }
        current
    }
}

impl<K, V> ops::Index<usize> for NodeArena<K, V> {
    type Output = SkipNode<K, V>;

    #[inline]
    fn index(&self, slot: usize) -> &SkipNode<K, V> {
        match self.slots.get(slot) {
            Some(Some(node)) => node,
            _ => unreachable!("link to vacant slot {slot}"),
        }
    }
}

impl<K, V> ops::IndexMut<usize> for NodeArena<K, V> {
    #[inline]
    fn index_mut(&mut self, slot: usize) -> &mut SkipNode<K, V> {
        match self.slots.get_mut(slot) {
            Some(Some(node)) => node,
            _ => unreachable!("link to vacant slot {slot}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{NodeArena, SkipNode};

    /// Build `0..n` with every other node promoted, without going through the
    /// map so the arena can be checked on its own.
    fn new_arena_for_test(n: usize) -> NodeArena<usize, usize> {
        let mut arena = NodeArena::new(2);
        let mut last = [None, None];
        for i in 0..n {
            let level = if i % 2 == 1 { 2 } else { 1 };
            let slot = arena.alloc(SkipNode::new(i, i * 10, level));
            for (l, prev) in last.iter_mut().enumerate().take(level) {
                arena.set_next(*prev, l, Some(slot));
                *prev = Some(slot);
            }
        }
        arena
    }

    fn collect_level(arena: &NodeArena<usize, usize>, level: usize) -> Vec<usize> {
        let mut keys = Vec::new();
        let mut current = None;
        while let Some(next) = arena.next(current, level) {
            keys.push(arena[next].key);
            current = Some(next);
        }
        keys
    }

    #[test]
    fn links_follow_levels() {
        let arena = new_arena_for_test(6);
        assert_eq!(arena.height(), 2);
        assert_eq!(arena.live(), 6);
        assert_eq!(collect_level(&arena, 0), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(collect_level(&arena, 1), vec![1, 3, 5]);
    }

    #[test]
    fn advance_stops_before_rejected_key() {
        let arena = new_arena_for_test(10);
        let at = arena.advance_while_at_level(None, 1, |&k| k < 6);
        assert_eq!(at.map(|slot| arena[slot].key), Some(5));
        let at = arena.advance_while_at_level(at, 0, |&k| k <= 7);
        assert_eq!(at.map(|slot| arena[slot].key), Some(7));
        assert_eq!(arena.advance_while_at_level(None, 0, |_| false), None);
    }

    #[test]
    fn released_slots_are_reused() {
        let mut arena = new_arena_for_test(4);
        // Key 2 only sits on level 0; unlink it there before releasing it.
        arena.set_next(Some(1), 0, Some(3));
        let node = arena.release(2);
        assert_eq!(node.into_entry(), (2, 20));
        assert_eq!(arena.live(), 3);

        let slot = arena.alloc(SkipNode::new(7, 70, 1));
        assert_eq!(slot, 2);
        assert_eq!(arena.live(), 4);
        assert_eq!(arena[slot].level(), 1);
    }

    #[test]
    fn clear_resets_head() {
        let mut arena = new_arena_for_test(8);
        arena.clear();
        assert_eq!(arena.live(), 0);
        assert_eq!(arena.height(), 2);
        assert_eq!(arena.links(None), &[None, None]);
        assert!(collect_level(&arena, 0).is_empty());
    }

    #[test]
    fn debug_node() {
        let node = SkipNode::new("a", 1, 3);
        assert_eq!(format!("{node:?}"), r#"["a": 1; 3]"#);
    }
}
