//! Skiplists use a probabilistic distribution of nodes over the internal
//! levels, whereby the lowest level (level 0) contains all the nodes, and each
//! level $n > 0$ will contain a random subset of the nodes on level `n - 1`.
//!
//! Most commonly, a geometric distribution is used whereby the chance that a
//! node occupies level $n$ is $p$ times the chance of occupying level $n-1$
//! (with $0 < p < 1$). This is what [`Geometric`] provides.
//!
//! It is very unlikely that this will need to be changed as the default should
//! suffice, but if need be custom level generators can be implemented and
//! handed to [`SkipMap::with_level_generator`][crate::SkipMap::with_level_generator].

pub mod geometric;

pub use geometric::{Geometric, GeometricError};

// ////////////////////////////////////////////////////////////////////////////
// Level Generator
// ////////////////////////////////////////////////////////////////////////////

/// Upon the insertion of a new node in the map, the node is replicated to
/// higher levels with a certain probability as determined by a
/// [`LevelGenerator`].
pub trait LevelGenerator {
    /// The total number of levels that are assumed to exist.
    ///
    /// This is the height of the head tower of the map and is fixed for the
    /// lifetime of the generator.
    #[must_use]
    fn total(&self) -> usize;

    /// Generate the number of levels a new node participates in.
    ///
    /// The result must lie in `[1, total]`. A node with level `n` is linked
    /// on levels `0..n`.
    #[must_use]
    fn level(&mut self) -> usize;
}

/// Minimum number of levels needed so that a list of `n` elements has only a
/// handful of nodes on its highest level when using $p = 1/2$.
#[must_use]
pub fn levels_required(n: usize) -> usize {
    if n == 0 {
        1
    } else {
        usize::BITS as usize - n.leading_zeros() as usize
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::levels_required;

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(2, 2)]
    #[case(3, 2)]
    #[case(1023, 10)]
    #[case(1024, 11)]
    fn levels_required_matches_bit_length(#[case] n: usize, #[case] expected: usize) {
        assert_eq!(levels_required(n), expected);
    }
}
