//! Configuration of a [`SkipMap`] before it is created.

use crate::level_generator::geometric::{DEFAULT_HEIGHT, DEFAULT_PROBABILITY};
use crate::level_generator::{Geometric, GeometricError};
use crate::skipmap::SkipMap;

/// Collects the parameters of a [`SkipMap`] using a geometric level
/// generator, and validates them when the map is built.
///
/// # Examples
///
/// ```
/// use arena_skiplist::{SkipMap, SkipMapBuilder};
///
/// let mut skipmap: SkipMap<&str, u32> = SkipMapBuilder::default()
///     .height(8)
///     .probability(0.25)
///     .seed(42)
///     .build()
///     .unwrap();
/// skipmap.insert("a", 1);
/// assert_eq!(skipmap.height(), 8);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SkipMapBuilder {
    height: usize,
    probability: f64,
    seed: Option<u64>,
}

impl Default for SkipMapBuilder {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            probability: DEFAULT_PROBABILITY,
            seed: None,
        }
    }
}

impl SkipMapBuilder {
    /// Set the number of levels of the head tower.
    #[must_use]
    pub fn height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }

    /// Set the probability that a node is promoted to the next level.
    #[must_use]
    pub fn probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Seed the level generator, making the shape of the map reproducible.
    ///
    /// Without a seed the generator is seeded from the thread-local generator
    /// of [`rand`].
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the level generator described by this configuration.
    ///
    /// # Errors
    ///
    /// See [`Geometric::new`].
    pub fn level_generator(&self) -> Result<Geometric, GeometricError> {
        match self.seed {
            Some(seed) => Geometric::with_seed(self.height, self.probability, seed),
            None => Geometric::new(self.height, self.probability),
        }
    }

    /// Create an empty map with this configuration.
    ///
    /// # Errors
    ///
    /// Fails if the height is zero or the probability is not in `(0, 1)`.
    pub fn build<K: Ord, V>(&self) -> Result<SkipMap<K, V>, GeometricError> {
        self.level_generator().map(SkipMap::from_level_generator)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    use super::SkipMapBuilder;
    use crate::level_generator::GeometricError;
    use crate::skipmap::SkipMap;

    #[test]
    fn defaults() -> Result<()> {
        let builder = SkipMapBuilder::default();
        let sm: SkipMap<u8, u8> = builder.build()?;
        assert_eq!(sm.height(), 16);
        assert!(sm.is_empty());
        Ok(())
    }

    #[test]
    fn rejects_invalid_configuration() {
        let zero = SkipMapBuilder::default().height(0).build::<u8, u8>();
        assert_eq!(zero.err(), Some(GeometricError::ZeroMax));

        let p = SkipMapBuilder::default().probability(1.0).build::<u8, u8>();
        assert_eq!(p.err(), Some(GeometricError::InvalidProbability));
    }

    #[test]
    fn seeded_maps_share_structure() -> Result<()> {
        let builder = SkipMapBuilder::default().height(6).seed(0x1234_abcd);
        let mut a: SkipMap<u32, u32> = builder.build()?;
        let mut b: SkipMap<u32, u32> = builder.build()?;
        for i in 0..200 {
            a.insert(i, i);
            b.insert(i, i);
        }
        assert_eq!(a.level_counts(), b.level_counts());
        Ok(())
    }
}
