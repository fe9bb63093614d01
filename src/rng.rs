//! Random number service for the simulation.
//!
//! Everything random in the simulation goes through [`RandomSource`], so tests
//! can swap in a scripted source and real runs can be reproduced from a seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform integers over a half-open range
pub trait RandomSource {
    /// Uniform integer in `[min, max)`. Panics if the range is empty.
    fn random_int(&mut self, min: usize, max: usize) -> usize;
}

/// ChaCha-backed RNG used by the application
pub struct SimRng {
    rng: ChaCha8Rng,
}

impl SimRng {
    /// Create a reproducible RNG from a `u64` seed
    pub fn from_seed_u64(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create an RNG seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Seed from settings if one was given, otherwise from entropy
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed_u64(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SimRng {
    fn random_int(&mut self, min: usize, max: usize) -> usize {
        assert!(min < max, "random_int called with empty range [{min}, {max})");
        self.rng.gen_range(min..max)
    }
}

/// Replays a fixed list of draws, then optionally repeats a fallback value.
///
/// Every draw is checked against the requested range so a badly scripted test
/// fails at the draw rather than somewhere downstream.
#[cfg(test)]
pub struct ScriptedRandom {
    script: std::collections::VecDeque<usize>,
    fallback: Option<usize>,
    draws: usize,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(script: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: None,
            draws: 0,
        }
    }

    /// Returns `value` for every draw
    pub fn repeating(value: usize) -> Self {
        Self {
            script: Default::default(),
            fallback: Some(value),
            draws: 0,
        }
    }

    /// Continue with `value` once the script runs out
    pub fn then_repeat(mut self, value: usize) -> Self {
        self.fallback = Some(value);
        self
    }

    /// Number of draws taken so far
    pub fn draws(&self) -> usize {
        self.draws
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn random_int(&mut self, min: usize, max: usize) -> usize {
        let value = self
            .script
            .pop_front()
            .or(self.fallback)
            .expect("scripted random source exhausted");
        assert!(
            (min..max).contains(&value),
            "scripted value {value} outside requested range [{min}, {max})"
        );
        self.draws += 1;
        value
    }
}
