//! Injectable randomness.
//!
//! Display flags and section shuffles draw from a [`RandomSource`] so that
//! tests can supply an exact sequence and assert the outcome.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of random decisions used by the catalog pipeline.
pub trait RandomSource: Send {
    /// Returns `true` with the given probability (clamped to `0.0..=1.0`).
    fn chance(&mut self, probability: f64) -> bool;

    /// Returns a uniformly distributed index in `0..upper`.
    ///
    /// Callers never pass `upper == 0`.
    fn below(&mut self, upper: usize) -> usize;
}

/// Shuffle a slice in place with a uniform random permutation (Fisher-Yates).
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
}

/// Production randomness backed by a `StdRng`.
pub struct StdRandom(StdRng);

impl StdRandom {
    /// Seed from the operating system.
    #[must_use]
    pub fn from_os() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Deterministic generator for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_os()
    }
}

impl RandomSource for StdRandom {
    fn chance(&mut self, probability: f64) -> bool {
        self.0.random_bool(probability.clamp(0.0, 1.0))
    }

    fn below(&mut self, upper: usize) -> usize {
        self.0.random_range(0..upper)
    }
}

/// Replays fixed decisions.
///
/// Once a script runs out, `chance` answers `false` and `below` answers `0`.
/// Scripted indices are reduced modulo `upper`.
#[derive(Debug, Default, Clone)]
pub struct ScriptedRandom {
    chances: VecDeque<bool>,
    indices: VecDeque<usize>,
}

impl ScriptedRandom {
    #[must_use]
    pub fn new(chances: impl IntoIterator<Item = bool>, indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            chances: chances.into_iter().collect(),
            indices: indices.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn chance(&mut self, _probability: f64) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }

    fn below(&mut self, upper: usize) -> usize {
        self.indices.pop_front().map_or(0, |i| i % upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_replays_then_defaults() {
        let mut rng = ScriptedRandom::new([true, false], [7]);
        assert!(rng.chance(0.5));
        assert!(!rng.chance(0.5));
        assert!(!rng.chance(0.5));
        assert_eq!(rng.below(5), 2);
        assert_eq!(rng.below(5), 0);
    }

    #[test]
    fn test_shuffle_with_zero_indices_rotates() {
        // Always picking 0 swaps the tail element to the front at every step.
        let mut items = vec![1, 2, 3, 4];
        shuffle(&mut items, &mut ScriptedRandom::default());
        assert_eq!(items, vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = StdRandom::seeded(42);
        let mut items: Vec<u32> = (0..50).collect();
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = StdRandom::seeded(7);
        let mut b = StdRandom::seeded(7);
        for _ in 0..20 {
            assert_eq!(a.below(100), b.below(100));
            assert_eq!(a.chance(0.3), b.chance(0.3));
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = StdRandom::seeded(1);
        assert!(rng.chance(1.0));
        assert!(!rng.chance(0.0));
        assert!(rng.chance(4.0));
    }
}
