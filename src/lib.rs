//! A skiplist is a way of storing elements in such a way that elements can be
//! efficiently accessed, inserted and removed, all in `O(log(n))` on average.
//!
//! Conceptually, a skiplist resembles something like:
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------> [9] ---------->
//! <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
//! ```
//!
//! where each node `[x]` has references to nodes further down the list,
//! allowing the algorithm to effectively skip ahead.
//!
//! This crate provides [`SkipMap`], a map from unique keys to values kept in
//! ascending key order. Its nodes live in an index-based arena: a link from one
//! node to the next is a slot index rather than a pointer, so the whole
//! structure is plain safe Rust and is released in one go when the map is
//! dropped.
//!
//! Keys are ordered through [`Ord`], which **must** be well-behaved. An
//! inconsistent ordering will not cause memory unsafety, but entries may then
//! become unreachable.
//!
//! ```
//! use arena_skiplist::SkipMap;
//!
//! let mut skipmap = SkipMap::try_new(8, 0.5).unwrap();
//! skipmap.insert("b", 2);
//! skipmap.insert("a", 1);
//! assert_eq!(skipmap.get("a"), Some(&1));
//!
//! let mut cursor = skipmap.cursor();
//! while cursor.advance() {
//!     println!("{:?}", cursor.entry());
//! }
//!
//! assert_eq!(skipmap.remove("b"), Some(2));
//! assert_eq!(skipmap.len(), 1);
//! ```
//!
//! The map does no locking. Callers sharing one between threads must
//! serialize access to the whole map themselves.

pub mod builder;
pub mod level_generator;
pub mod skipmap;
mod skipnode;

pub use builder::SkipMapBuilder;
pub use level_generator::{Geometric, GeometricError, LevelGenerator};
pub use skipmap::{Cursor, SkipMap};
