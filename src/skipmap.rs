//! SkipMap stores key-value pairs, with the keys being unique and always
//! sorted.

use std::{borrow::Borrow, fmt, iter, mem, num::NonZeroUsize, ops};

use log::{debug, trace};

use crate::builder::SkipMapBuilder;
use crate::level_generator::{Geometric, GeometricError, LevelGenerator, levels_required};
use crate::skipnode::{Link, NodeArena, Position, SkipNode};

// ////////////////////////////////////////////////////////////////////////////
// SkipMap
// ////////////////////////////////////////////////////////////////////////////

/// The skipmap provides a way of storing element pairs such that the keys are
/// always sorted whilst at the same time providing efficient way to access,
/// insert and remove nodes.
///
/// Every key is stored at most once. Inserting a key that is already present
/// replaces its value in place.
///
/// Note that mutable references to keys are not available at all as this could
/// result in a node being left out of the proper ordering.
///
/// The map is meant for a single thread. It does no locking of its own, so a
/// map shared between threads has to be wrapped in a lock as a whole.
///
/// Cloning a map clones its level generator, which for [`Geometric`] means a
/// freshly seeded one: the clone holds the same entries but grows its own
/// towers.
#[derive(Clone)]
pub struct SkipMap<K, V, G = Geometric> {
    nodes: NodeArena<K, V>,
    len: usize,
    level_generator: G,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<K, V> SkipMap<K, V>
where
    K: Ord,
{
    /// Create a new skipmap with the default number of 16 levels and a
    /// promotion probability of one half.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let skipmap: SkipMap<i64, String> = SkipMap::new();
    /// assert_eq!(skipmap.height(), 16);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::from_level_generator(Geometric::default())
    }

    /// Create a new skipmap with `height` levels, where a node present on one
    /// level is also present on the next with probability `p`.
    ///
    /// # Errors
    ///
    /// The height must be non-zero and `p` must lie in `(0, 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::{GeometricError, SkipMap};
    ///
    /// let skipmap = SkipMap::<u32, u32>::try_new(4, 0.5).unwrap();
    /// assert_eq!(skipmap.height(), 4);
    ///
    /// assert_eq!(
    ///     SkipMap::<u32, u32>::try_new(0, 0.5).err(),
    ///     Some(GeometricError::ZeroMax)
    /// );
    /// ```
    #[inline]
    pub fn try_new(height: usize, p: f64) -> Result<Self, GeometricError> {
        Geometric::new(height, p).map(Self::from_level_generator)
    }

    /// Constructs a new, empty skipmap with the optimal number of levels for
    /// the intended capacity, ensuring that only *a few* nodes occupy the
    /// highest level.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::with_capacity(100);
    /// skipmap.extend((0..100).map(|x| (x, x)));
    /// assert_eq!(skipmap.height(), 8);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let height = NonZeroUsize::MIN.saturating_add(levels_required(capacity));
        let level_generator = Geometric::with_height(height);
        SkipMap {
            nodes: NodeArena::with_capacity(level_generator.total(), capacity),
            len: 0,
            level_generator,
        }
    }

    /// Start configuring a skipmap.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let skipmap: SkipMap<u32, u32> = SkipMap::<u32, u32>::builder().height(4).build().unwrap();
    /// assert_eq!(skipmap.height(), 4);
    /// ```
    #[inline]
    #[must_use]
    pub fn builder() -> SkipMapBuilder {
        SkipMapBuilder::default()
    }
}

impl<K, V, G> SkipMap<K, V, G>
where
    K: Ord,
    G: LevelGenerator,
{
    /// Create a new skipmap whose node levels are drawn from
    /// `level_generator`. The map has as many levels as the generator
    /// reports through [`LevelGenerator::total`].
    ///
    /// # Errors
    ///
    /// Returns [`GeometricError::ZeroMax`] if the generator reports no
    /// levels at all.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::{Geometric, SkipMap};
    ///
    /// let generator = Geometric::with_seed(8, 0.25, 7).unwrap();
    /// let mut skipmap = SkipMap::with_level_generator(generator).unwrap();
    /// skipmap.insert(1, "one");
    /// assert_eq!(skipmap.height(), 8);
    /// ```
    #[inline]
    pub fn with_level_generator(level_generator: G) -> Result<Self, GeometricError> {
        if level_generator.total() == 0 {
            return Err(GeometricError::ZeroMax);
        }
        Ok(Self::from_level_generator(level_generator))
    }

    /// Same as [`SkipMap::with_level_generator`], for generators whose total
    /// has already been checked to be non-zero.
    #[inline]
    pub(crate) fn from_level_generator(level_generator: G) -> Self {
        let height = level_generator.total();
        debug!("new skipmap with {height} level(s)");
        SkipMap {
            nodes: NodeArena::new(height),
            len: 0,
            level_generator,
        }
    }

    /// Insert the key-value pair into the skipmap.
    ///
    /// If the key was already present, its value is replaced and the old
    /// value is returned; the length is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    ///
    /// assert_eq!(skipmap.insert(1, "Hello"), None);
    /// assert_eq!(skipmap.insert(2, "World"), None);
    /// assert_eq!(skipmap.insert(1, "Bonjour"), Some("Hello"));
    /// assert_eq!(skipmap.len(), 2);
    /// assert_eq!(skipmap.get(&1), Some(&"Bonjour"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let height = self.nodes.height();
        let mut update: Vec<Position> = vec![None; height];

        let mut current = None;
        for level in (0..height).rev() {
            current = self
                .nodes
                .advance_while_at_level(current, level, |node_key| *node_key <= key);
            update[level] = current;
        }

        if let Some(slot) = current {
            let node = &mut self.nodes[slot];
            if node.key == key {
                return Some(mem::replace(&mut node.value, value));
            }
        }

        let node_level = self.level_generator.level().clamp(1, height);
        let slot = self.nodes.alloc(SkipNode::new(key, value, node_level));
        for (level, &prev) in update.iter().enumerate().take(node_level) {
            let next = self.nodes.next(prev, level);
            self.nodes.set_next(Some(slot), level, next);
            self.nodes.set_next(prev, level, Some(slot));
        }
        self.len += 1;
        trace!("spliced slot {slot} on {node_level} level(s)");

        None
    }
}

impl<K, V, G> SkipMap<K, V, G> {
    /// Clears the skipmap, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// skipmap.clear();
    /// assert!(skipmap.is_empty());
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        debug!("clearing skipmap of {} entries", self.len);
        self.len = 0;
        self.nodes.clear();
    }

    /// Returns the number of elements in the skipmap.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// assert_eq!(skipmap.len(), 10);
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the skipmap contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// assert!(skipmap.is_empty());
    ///
    /// skipmap.insert(1, "Rust");
    /// assert!(!skipmap.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of levels of the skipmap, fixed at construction.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.nodes.height()
    }

    /// Provides a reference to the first key-value pair, or `None` if the
    /// skipmap is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// assert!(skipmap.first().is_none());
    ///
    /// skipmap.insert(2, "World");
    /// skipmap.insert(1, "Hello");
    /// assert_eq!(skipmap.first(), Some((&1, &"Hello")));
    /// ```
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.nodes.next(None, 0).map(|slot| {
            let node = &self.nodes[slot];
            (&node.key, &node.value)
        })
    }

    /// Removes the first key-value pair and returns it, or `None` if the
    /// skipmap is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.insert(1, "Hello");
    /// skipmap.insert(2, "World");
    ///
    /// assert_eq!(skipmap.pop_first(), Some((1, "Hello")));
    /// assert_eq!(skipmap.pop_first(), Some((2, "World")));
    /// assert!(skipmap.pop_first().is_none());
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let slot = self.nodes.next(None, 0)?;
        // The first node is preceded by the head on every level it spans.
        let links = self.nodes[slot].links.clone();
        for (level, next) in links.into_iter().enumerate() {
            self.nodes.set_next(None, level, next);
        }
        self.len -= 1;
        Some(self.nodes.release(slot).into_entry())
    }

    /// Returns a reference to the value stored under `key`, or `None` if the
    /// key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// assert!(skipmap.get(&0).is_none());
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// assert_eq!(skipmap.get(&0), Some(&0));
    /// assert!(skipmap.get(&10).is_none());
    /// ```
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_key(key).map(|slot| &self.nodes[slot].value)
    }

    /// Returns the stored key and its value, or `None` if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.insert(String::from("a"), 1);
    /// assert_eq!(skipmap.get_key_value("a"), Some((&String::from("a"), &1)));
    /// ```
    #[inline]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_key(key).map(|slot| {
            let node = &self.nodes[slot];
            (&node.key, &node.value)
        })
    }

    /// Returns a mutable reference to the value stored under `key`, or `None`
    /// if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// if let Some(x) = skipmap.get_mut(&0) {
    ///     *x = 100;
    /// }
    /// assert_eq!(skipmap.get(&0), Some(&100));
    /// ```
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let slot = self.find_key(key)?;
        Some(&mut self.nodes[slot].value)
    }

    /// Returns true if the key is contained in the skipmap.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// assert!(skipmap.contains_key(&4));
    /// assert!(!skipmap.contains_key(&15));
    /// ```
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_key(key).is_some()
    }

    /// Removes the entry stored under `key` and returns its value, or `None`
    /// if there is no such key in the skipmap.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// assert_eq!(skipmap.remove(&4), Some(4));
    /// assert!(skipmap.remove(&4).is_none());
    /// assert_eq!(skipmap.len(), 9);
    /// ```
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes the entry stored under `key` and returns both the stored key
    /// and its value, or `None` if there is no such key in the skipmap.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.insert(String::from("a"), 1);
    /// assert_eq!(skipmap.remove_entry("a"), Some((String::from("a"), 1)));
    /// assert!(skipmap.is_empty());
    /// ```
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut found: Link = None;
        let mut current = None;
        for level in (0..self.nodes.height()).rev() {
            current = self
                .nodes
                .advance_while_at_level(current, level, |node_key| Borrow::<Q>::borrow(node_key) < key);

            if let Some(next) = self.nodes.next(current, level) {
                if self.nodes[next].key.borrow() == key {
                    let after = self.nodes.next(Some(next), level);
                    self.nodes.set_next(current, level, after);
                    found = Some(next);
                }
            }
        }

        let slot = found?;
        self.len -= 1;
        trace!("unlinked slot {slot}");
        Some(self.nodes.release(slot).into_entry())
    }

    /// Creates a cursor positioned before the first entry.
    ///
    /// The cursor borrows the skipmap, so the map cannot be modified while the
    /// cursor is in use.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.insert(2, "b");
    /// skipmap.insert(1, "a");
    ///
    /// let mut cursor = skipmap.cursor();
    /// assert_eq!(cursor.key(), None);
    /// assert!(cursor.advance());
    /// assert_eq!(cursor.entry(), Some((&1, &"a")));
    /// assert!(cursor.advance());
    /// assert_eq!(cursor.key(), Some(&2));
    /// assert!(!cursor.advance());
    /// assert_eq!(cursor.key(), Some(&2));
    /// ```
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> Cursor<'_, K, V> {
        Cursor {
            nodes: &self.nodes,
            current: None,
        }
    }

    /// Creates an iterator over the entries of the skipmap, in ascending key
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).rev().map(|x| (x, x * 10)));
    /// for (i, (k, v)) in skipmap.iter().enumerate() {
    ///     assert_eq!(*k, i);
    ///     assert_eq!(*v, i * 10);
    /// }
    /// ```
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            next: self.nodes.next(None, 0),
            remaining: self.len,
        }
    }

    /// Creates an iterator over the entries of the skipmap, in ascending key
    /// order, with mutable references to the values.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// for (k, v) in skipmap.iter_mut() {
    ///     *v += *k;
    /// }
    /// assert_eq!(skipmap.get(&4), Some(&8));
    /// ```
    #[must_use]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let next = self.nodes.next(None, 0);
        IterMut {
            slots: self.nodes.slots_mut(),
            next,
            remaining: self.len,
        }
    }

    /// Creates an iterator over the keys of the skipmap, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// assert!(skipmap.keys().copied().eq(0..10));
    /// ```
    #[inline]
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Creates an iterator over the values of the skipmap, in ascending key
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).map(|x| (x, x * 2)));
    /// assert!(skipmap.values().copied().eq((0..10).map(|x| x * 2)));
    /// ```
    #[inline]
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Creates an iterator over mutable references to the values of the
    /// skipmap, in ascending key order.
    #[inline]
    #[must_use]
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.iter_mut())
    }

    /// The number of nodes linked on each level, starting from level 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_skiplist::SkipMap;
    ///
    /// let mut skipmap = SkipMap::try_new(4, 0.5).unwrap();
    /// skipmap.extend((0..100).map(|x| (x, x)));
    /// let counts = skipmap.level_counts();
    /// assert_eq!(counts.len(), 4);
    /// assert_eq!(counts[0], 100);
    /// assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    /// ```
    #[must_use]
    pub fn level_counts(&self) -> Vec<usize> {
        (0..self.nodes.height())
            .map(|level| {
                let mut count = 0;
                let mut current = self.nodes.next(None, level);
                while let Some(slot) = current {
                    count += 1;
                    current = self.nodes.next(Some(slot), level);
                }
                count
            })
            .collect()
    }
}

// ///////////////////////////////////////////////
// Internal methods
// ///////////////////////////////////////////////

impl<K, V, G> SkipMap<K, V, G> {
    /// Find the slot of the node equal to the given key.
    ///
    /// The descent stops on the last node whose key is less than or equal to
    /// the target on every level, so the node reached on level 0 is either
    /// the match or its closest predecessor.
    fn find_key<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let last_le = (0..self.nodes.height()).rev().fold(None, |current, level| {
            self.nodes
                .advance_while_at_level(current, level, |node_key| Borrow::<Q>::borrow(node_key) <= key)
        });
        let slot = last_le?;
        (self.nodes[slot].key.borrow() == key).then_some(slot)
    }
}

impl<K: Ord, V, G> SkipMap<K, V, G> {
    /// Checks the integrity of the skipmap.
    #[cfg(test)]
    pub(crate) fn check(&self) {
        let height = self.nodes.height();
        let mut on_level: Vec<Vec<usize>> = Vec::with_capacity(height);
        for level in 0..height {
            let mut slots = Vec::new();
            let mut current = self.nodes.next(None, level);
            while let Some(slot) = current {
                let node = &self.nodes[slot];
                assert!(node.level() > level, "slot {slot} linked above its level");
                assert!(node.level() <= height, "slot {slot} taller than the map");
                if let Some(&prev) = slots.last() {
                    assert!(
                        self.nodes[prev].key < node.key,
                        "keys out of order on level {level}"
                    );
                }
                slots.push(slot);
                current = node.links[level];
            }
            on_level.push(slots);
        }

        assert_eq!(on_level[0].len(), self.len);
        assert_eq!(self.nodes.live(), self.len);
        for level in 1..height {
            let expected: Vec<usize> = on_level[0]
                .iter()
                .copied()
                .filter(|&slot| self.nodes[slot].level() > level)
                .collect();
            assert_eq!(on_level[level], expected, "level {level} misses nodes");
        }
    }
}

impl<K, V, G> SkipMap<K, V, G>
where
    K: fmt::Debug,
{
    /// Logs the internal structure of the skipmap at debug level, one line per
    /// level with the topmost level first.
    ///
    /// ```text
    /// <head>----- -> 2---------------
    /// <head> -> 1 -> 2----- -> 4-----
    /// <head> -> 1 -> 2 -> 3 -> 4 -> 5
    /// ```
    pub fn debug_structure(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        for row in self.structure_rows().iter().rev() {
            debug!("{row}");
        }
    }

    /// Renders each level as a row, bottom level first.
    fn structure_rows(&self) -> Vec<String> {
        let height = self.nodes.height();
        let mut rows: Vec<String> = iter::repeat_with(|| String::from("<head>"))
            .take(height)
            .collect();

        let mut current = self.nodes.next(None, 0);
        while let Some(slot) = current {
            let node = &self.nodes[slot];
            let label = format!("{:?}", node.key);
            for (level, row) in rows.iter_mut().enumerate() {
                if level < node.level() {
                    row.push_str(" -> ");
                    row.push_str(&label);
                } else {
                    row.push_str(&"-".repeat(label.len() + 4));
                }
            }
            current = node.links[0];
        }
        rows
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<K: Ord, V> Default for SkipMap<K, V> {
    #[inline]
    fn default() -> SkipMap<K, V> {
        SkipMap::new()
    }
}

/// This implementation of `PartialEq` only checks that the *entries* are
/// equal; it does not check the level generators.
impl<K, V, G, H> PartialEq<SkipMap<K, V, H>> for SkipMap<K, V, G>
where
    K: PartialEq,
    V: PartialEq,
{
    #[inline]
    fn eq(&self, other: &SkipMap<K, V, H>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, G> Eq for SkipMap<K, V, G> {}

impl<K, V, G> Extend<(K, V)> for SkipMap<K, V, G>
where
    K: Ord,
    G: LevelGenerator,
{
    #[inline]
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iterable: I) {
        for (key, value) in iterable {
            self.insert(key, value);
        }
    }
}

impl<K, V, G, Q> ops::Index<&Q> for SkipMap<K, V, G>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the skipmap.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, G> fmt::Debug for SkipMap<K, V, G>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;

        for (i, (k, v)) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "({k:?}, {v:?})")?;
        }
        write!(f, "]")
    }
}

impl<K, V, G> fmt::Display for SkipMap<K, V, G>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;

        for (i, (k, v)) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "({k}, {v})")?;
        }
        write!(f, "]")
    }
}

impl<K, V, G> IntoIterator for SkipMap<K, V, G> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            next: self.nodes.next(None, 0),
            remaining: self.len,
            nodes: self.nodes,
        }
    }
}

impl<'a, K, V, G> IntoIterator for &'a SkipMap<K, V, G> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, G> IntoIterator for &'a mut SkipMap<K, V, G> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V> FromIterator<(K, V)> for SkipMap<K, V>
where
    K: Ord,
{
    #[inline]
    fn from_iter<I>(iter: I) -> SkipMap<K, V>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut skipmap = SkipMap::new();
        skipmap.extend(iter);
        skipmap
    }
}

// ///////////////////////////////////////////////
// Extra structs
// ///////////////////////////////////////////////

/// A cursor over the entries of a [`SkipMap`], in ascending key order.
///
/// The cursor starts *before* the first entry: [`Cursor::key`],
/// [`Cursor::value`] and [`Cursor::entry`] return `None` until
/// [`Cursor::advance`] has succeeded once. Once on the last entry, further
/// calls to `advance` return `false` and leave the cursor where it is.
///
/// A cursor is a single pass over the map and cannot be rewound. It borrows
/// the map for its whole lifetime, so no entry can be inserted or removed
/// while it is alive.
pub struct Cursor<'a, K, V> {
    nodes: &'a NodeArena<K, V>,
    current: Position,
}

impl<'a, K, V> Cursor<'a, K, V> {
    /// Moves to the next entry. Returns `false`, without moving, if there is
    /// no next entry.
    #[inline]
    pub fn advance(&mut self) -> bool {
        match self.nodes.next(self.current, 0) {
            Some(next) => {
                self.current = Some(next);
                true
            }
            None => false,
        }
    }

    /// The key of the current entry, or `None` if the cursor has not been
    /// advanced yet.
    #[inline]
    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.entry().map(|(key, _)| key)
    }

    /// The value of the current entry, or `None` if the cursor has not been
    /// advanced yet.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.entry().map(|(_, value)| value)
    }

    /// The current entry, or `None` if the cursor has not been advanced yet.
    #[inline]
    #[must_use]
    pub fn entry(&self) -> Option<(&'a K, &'a V)> {
        let nodes = self.nodes;
        self.current.map(|slot| {
            let node = &nodes[slot];
            (&node.key, &node.value)
        })
    }
}

/// An iterator over the entries of a [`SkipMap`], created by
/// [`SkipMap::iter`].
pub struct Iter<'a, K, V> {
    nodes: &'a NodeArena<K, V>,
    next: Link,
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            nodes: self.nodes,
            next: self.next,
            remaining: self.remaining,
        }
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = &nodes[self.next?];
        self.next = node.links[0];
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> iter::FusedIterator for Iter<'_, K, V> {}

/// An iterator over the entries of a [`SkipMap`] with mutable values, created
/// by [`SkipMap::iter_mut`].
pub struct IterMut<'a, K, V> {
    // Taken out one by one while following level 0.
    slots: Vec<Option<&'a mut SkipNode<K, V>>>,
    next: Link,
    remaining: usize,
}

impl<'a, K: 'a, V: 'a> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let SkipNode { key, value, links } =
            self.slots.get_mut(self.next?).and_then(Option::take)?;
        self.next = links[0];
        self.remaining -= 1;
        Some((&*key, value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> iter::FusedIterator for IterMut<'_, K, V> {}

/// An owning iterator over the entries of a [`SkipMap`], in ascending key
/// order.
pub struct IntoIter<K, V> {
    nodes: NodeArena<K, V>,
    next: Link,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.release(self.next?);
        self.next = node.links[0];
        self.remaining -= 1;
        Some(node.into_entry())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> iter::FusedIterator for IntoIter<K, V> {}

/// An iterator over the keys of a [`SkipMap`].
#[derive(Clone)]
pub struct Keys<'a, K, V>(Iter<'a, K, V>);

impl<'a, K: 'a, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a [`SkipMap`].
#[derive(Clone)]
pub struct Values<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V: 'a> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// An iterator over mutable references to the values of a [`SkipMap`].
pub struct ValuesMut<'a, K, V>(IterMut<'a, K, V>);

impl<'a, K, V: 'a> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////
