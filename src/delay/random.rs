//! Randomness providers for delay generation

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::sync::{Mutex, PoisonError};

/// Source of the raw draws the delay formulas consume
///
/// Implementations must be safe to share between request tasks. The
/// generator only ever asks for one draw per delay.
pub trait RandomSource: Send + Sync {
    /// Uniform draw in `[low, high]`. Returns `low` when the range is empty.
    fn uniform(&self, low: f64, high: f64) -> f64;

    /// Draw from the standard normal distribution N(0, 1)
    fn standard_normal(&self) -> f64;
}

/// Process-wide source backed by the thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl ThreadRandom {
    pub fn new() -> Self {
        Self
    }
}

impl RandomSource for ThreadRandom {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        rand::rng().random_range(low..=high)
    }

    fn standard_normal(&self) -> f64 {
        rand::rng().sample(StandardNormal)
    }
}

/// Reproducible source for tests and `--seed` runs
///
/// Only the generator itself sits behind the lock.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, draw: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        draw(&mut rng)
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.with_rng(|rng| rng.random_range(low..=high))
    }

    fn standard_normal(&self) -> f64 {
        self.with_rng(|rng| rng.sample(StandardNormal))
    }
}
