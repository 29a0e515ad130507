//! Jitter sampling
//!
//! Draws bounded random delays and counts. The random source is owned by the
//! sampler and injected at construction, so seeded sources reproduce the same
//! sequence in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Inclusive millisecond range for a randomized delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    /// Lower bound (inclusive)
    pub min_ms: u64,
    /// Upper bound (inclusive)
    pub max_ms: u64,
}

impl DelayRange {
    /// Create a new delay range
    #[must_use]
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Whether `value` lies within the range (bounds normalised)
    #[must_use]
    pub fn contains(&self, value: u64) -> bool {
        let (lo, hi) = ordered(self.min_ms, self.max_ms);
        (lo..=hi).contains(&value)
    }

    /// Returns an error message if the bounds are inverted
    pub fn validate(&self) -> Result<(), String> {
        if self.min_ms > self.max_ms {
            return Err(format!(
                "min_ms ({}) must not exceed max_ms ({})",
                self.min_ms, self.max_ms
            ));
        }
        Ok(())
    }
}

/// Inclusive range for a randomized count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    /// Lower bound (inclusive)
    pub min: u32,
    /// Upper bound (inclusive)
    pub max: u32,
}

impl CountRange {
    /// Create a new count range
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies within the range (bounds normalised)
    #[must_use]
    pub fn contains(&self, value: u32) -> bool {
        let (lo, hi) = ordered(self.min, self.max);
        (lo..=hi).contains(&value)
    }

    /// Returns an error message if the bounds are inverted
    pub fn validate(&self) -> Result<(), String> {
        if self.min > self.max {
            return Err(format!(
                "min ({}) must not exceed max ({})",
                self.min, self.max
            ));
        }
        Ok(())
    }
}

fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Uniform sampler over bounded ranges.
///
/// Stateless apart from its random source.
#[derive(Debug, Clone)]
pub struct JitterSampler<R = StdRng> {
    rng: R,
}

impl JitterSampler<StdRng> {
    /// Sampler with a reproducible sequence
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Sampler seeded from OS entropy
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> JitterSampler<R> {
    /// Wrap an existing random source
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draw uniformly from `[min, max]`. Inverted bounds are swapped.
    pub fn sample(&mut self, min: u64, max: u64) -> u64 {
        let (lo, hi) = ordered(min, max);
        self.rng.gen_range(lo..=hi)
    }

    /// Draw a delay from a configured range
    pub fn sample_delay(&mut self, range: &DelayRange) -> u64 {
        self.sample(range.min_ms, range.max_ms)
    }

    /// Draw a count from a configured range
    pub fn sample_count(&mut self, range: &CountRange) -> u32 {
        let (lo, hi) = ordered(range.min, range.max);
        self.rng.gen_range(lo..=hi)
    }

    /// Draw uniformly from `[0, bound)`. Returns 0 when `bound` is 0.
    pub fn sample_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }

    /// Draw a signed value uniformly from `[min, max]`
    pub fn sample_signed(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = ordered(min, max);
        self.rng.gen_range(lo..=hi)
    }
}
