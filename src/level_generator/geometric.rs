//! Geometric level generator.

use std::num::NonZeroUsize;

use log::debug;
use rand::prelude::*;
use rand::rngs::SmallRng;
use thiserror::Error;

use crate::level_generator::LevelGenerator;

/// Height of the head tower used when none is configured.
pub const DEFAULT_HEIGHT: usize = 16;

/// Probability of promoting a node to the next level when none is configured.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Geometric`] level generator.
#[non_exhaustive]
pub enum GeometricError {
    /// The maximum number of levels must be non-zero.
    #[error("max must be non-zero.")]
    ZeroMax,
    /// The probability `$p$` must be in the range `$(0, 1)$`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
}

/// A level generator using a geometric distribution.
///
/// Every node starts on one level. It is then promoted one level at a time for
/// as long as a uniform draw from `$[0, 1)$` falls below `$p$`, which gives a
/// geometric distribution truncated at `$\max(1, \text{total} - 1)$` levels.
/// The topmost level of the head tower is therefore only populated when the
/// map has a single level.
///
/// The random number generator is seeded exactly once, when the generator is
/// created. A clone gets a fresh seed from the thread-local generator rather
/// than a copy of the state, so two clones do not draw the same levels.
#[derive(Debug)]
pub struct Geometric {
    /// The total number of levels that are assumed to exist.
    total: usize,
    /// The probability that a node is present in the next level.
    p: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl Clone for Geometric {
    fn clone(&self) -> Self {
        Geometric {
            total: self.total,
            p: self.p,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

impl Geometric {
    /// Create a new geometric level generator with `total` number of levels,
    /// and `p` as the probability that a given node is present in the next
    /// level.
    ///
    /// The generator is seeded from the thread-local generator of [`rand`].
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1 and `total` must be at least 1,
    /// otherwise a [`GeometricError`] is returned.
    #[inline]
    pub fn new(total: usize, p: f64) -> Result<Self, GeometricError> {
        Self::validate(total, p)?;
        debug!("geometric level generator: total = {total}, p = {p}");
        Ok(Geometric {
            total,
            p,
            rng: SmallRng::from_rng(&mut rand::rng()),
        })
    }

    /// Create a new geometric level generator whose sequence of levels is
    /// fully determined by `seed`.
    ///
    /// # Errors
    ///
    /// Same as [`Geometric::new`].
    #[inline]
    pub fn with_seed(total: usize, p: f64, seed: u64) -> Result<Self, GeometricError> {
        Self::validate(total, p)?;
        debug!("geometric level generator: total = {total}, p = {p}, seed = {seed:#x}");
        Ok(Geometric {
            total,
            p,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// Create a generator with `height` levels and the default probability of
    /// [`DEFAULT_PROBABILITY`], seeded from the thread-local generator.
    #[inline]
    #[must_use]
    pub fn with_height(height: NonZeroUsize) -> Self {
        Geometric {
            total: height.get(),
            p: DEFAULT_PROBABILITY,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    /// The probability that a node is promoted to the next level.
    #[inline]
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.p
    }

    fn validate(total: usize, p: f64) -> Result<(), GeometricError> {
        if total == 0 {
            return Err(GeometricError::ZeroMax);
        }
        if !(0.0 < p && p < 1.0) {
            return Err(GeometricError::InvalidProbability);
        }
        Ok(())
    }
}

impl Default for Geometric {
    /// A generator with [`DEFAULT_HEIGHT`] levels and
    /// [`DEFAULT_PROBABILITY`].
    #[inline]
    fn default() -> Self {
        Geometric::with_height(NonZeroUsize::MIN.saturating_add(DEFAULT_HEIGHT - 1))
    }
}

impl LevelGenerator for Geometric {
    #[inline]
    fn total(&self) -> usize {
        self.total
    }

    #[inline]
    fn level(&mut self) -> usize {
        let cap = self.total.saturating_sub(1).max(1);
        let mut level = 1;
        while level < cap && self.rng.random::<f64>() < self.p {
            level += 1;
        }
        level
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, bail};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{Geometric, GeometricError, LevelGenerator};

    #[test]
    fn invalid_max() {
        assert_eq!(Geometric::new(0, 0.5).err(), Some(GeometricError::ZeroMax));
        assert_eq!(
            Geometric::with_seed(0, 0.5, 7).err(),
            Some(GeometricError::ZeroMax)
        );
    }

    #[rstest]
    fn invalid_p(#[values(0.0, 1.0, -0.5, 1.5, f64::NAN)] p: f64) {
        assert_eq!(
            Geometric::new(4, p).err(),
            Some(GeometricError::InvalidProbability)
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(GeometricError::ZeroMax.to_string(), "max must be non-zero.");
        assert_eq!(
            GeometricError::InvalidProbability.to_string(),
            "p must be in (0, 1)."
        );
    }

    #[test]
    fn single_level() -> Result<()> {
        let mut generator = Geometric::new(1, 0.99)?;
        for _ in 0..1_000 {
            assert_eq!(generator.level(), 1);
        }
        Ok(())
    }

    #[rstest]
    fn new(#[values(2, 3, 16, 128)] n: usize, #[values(0.1, 0.5, 0.99)] p: f64) -> Result<()> {
        let mut generator = Geometric::new(n, p)?;
        assert_eq!(generator.total(), n);
        for _ in 0..100_000 {
            let level = generator.level();
            assert!((1..n).contains(&level), "level {level} outside [1, {n})");
        }

        // Both the bottom and the cap must be reachable.
        let mut found = false;
        for _ in 0..1_000_000 {
            if generator.level() == 1 {
                found = true;
                break;
            }
        }
        if !found {
            bail!("Failed to generate a single-level node.");
        }

        if p.powi(i32::try_from(n - 2)?) > 1e-4 {
            found = false;
            for _ in 0..1_000_000 {
                if generator.level() == n - 1 {
                    found = true;
                    break;
                }
            }
            if !found {
                bail!("Failed to generate a node of level {}.", n - 1);
            }
        }

        Ok(())
    }

    #[test]
    fn seeded_generators_agree() -> Result<()> {
        let mut a = Geometric::with_seed(12, 0.5, 0x1234_abcd)?;
        let mut b = Geometric::with_seed(12, 0.5, 0x1234_abcd)?;
        let left: Vec<_> = (0..256).map(|_| a.level()).collect();
        let right: Vec<_> = (0..256).map(|_| b.level()).collect();
        assert_eq!(left, right);
        Ok(())
    }

    #[test]
    fn clones_are_reseeded() -> Result<()> {
        let mut a = Geometric::with_seed(32, 0.5, 0x1234_abcd)?;
        let mut b = a.clone();
        assert_eq!(b.total(), 32);
        assert!((b.probability() - 0.5).abs() < f64::EPSILON);
        let left: Vec<_> = (0..256).map(|_| a.level()).collect();
        let right: Vec<_> = (0..256).map(|_| b.level()).collect();
        assert_ne!(left, right);
        Ok(())
    }

    #[test]
    fn default_generator() {
        let generator = Geometric::default();
        assert_eq!(generator.total(), super::DEFAULT_HEIGHT);
        assert!((generator.probability() - super::DEFAULT_PROBABILITY).abs() < f64::EPSILON);
    }

    #[test]
    fn promotion_rate_tracks_p() -> Result<()> {
        let mut generator = Geometric::with_seed(32, 0.25, 42)?;
        let samples: u32 = 200_000;
        let promoted = (0..samples).filter(|_| generator.level() > 1).count();
        #[expect(clippy::cast_precision_loss, reason = "sample counts are small")]
        let rate = promoted as f64 / f64::from(samples);
        assert!((rate - 0.25).abs() < 0.01, "promotion rate {rate}");
        Ok(())
    }
}
