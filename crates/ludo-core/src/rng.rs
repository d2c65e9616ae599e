//! Random number generator abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests, a seeded or scripted
//! implementation is injected so dice rolls are repeatable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Generate a random `f64` in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;
}

/// Production RNG backed by `StdRng`.
#[derive(Debug)]
pub struct SystemRng(StdRng);

impl SystemRng {
    /// Seeds from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Seeds from a fixed value, for reproducible sessions.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl DeterministicRng for SystemRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        self.0.random_range(min..=max)
    }

    fn next_f64(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}
