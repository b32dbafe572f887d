//! Random number sources for glyph selection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform random numbers for an effect.
///
/// Engines receive a boxed source at construction so tests can script the
/// exact sequence of draws.
pub trait RandomSource {
    /// Next value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, len)`. Returns 0 when `len` is 0.
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }

    /// Uniform integer in `[lo, hi]`. The bounds may be given in any order.
    fn range_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let span = (hi as i128 - lo as i128 + 1) as f64;
        let offset = (self.next_f64() * span).floor() as i128;
        (lo as i128 + offset).min(hi as i128) as i64
    }
}

/// [`RandomSource`] backed by the standard seeded generator.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Reproducible source for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    fn range_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self.rng.random_range(lo..=hi)
    }
}
