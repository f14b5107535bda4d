//! Randomness sources for layout generation.
//!
//! Every placement function takes a `&mut impl UniformSampler` instead of
//! reaching for a global generator, so the draw order is explicit and a run
//! is reproducible from its seed alone.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform sampling service consumed by the placement algorithms.
pub trait UniformSampler {
    /// Sample a real value uniformly from `[min, max)`.
    ///
    /// When `max <= min` the interval is empty and `min` is returned.
    fn sample(&mut self, min: f64, max: f64) -> f64;

    /// Sample a discrete index uniformly from `0..count`.
    ///
    /// Built on `sample` by flooring a real draw from `[0, count)`, which is
    /// how grid cells are picked. A `count` of zero has no valid index and
    /// yields 0.
    fn sample_index(&mut self, count: u32) -> u32 {
        let value = self.sample(0.0, count as f64).floor();
        (value.max(0.0) as u32).min(count.saturating_sub(1))
    }
}

/// Seeded pseudorandom sampler backed by `StdRng`.
pub struct SeededSampler {
    seed: u64,
    rng: StdRng,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed this sampler was created with (reported alongside every layout).
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl UniformSampler for SeededSampler {
    fn sample(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }
}

/// Sampler replaying a fixed script of unit fractions.
///
/// Each draw takes the next fraction `f` from the script and maps it to
/// `min + f * (max - min)`; the script wraps around when exhausted. Fractions
/// are clamped into `[0, 1)`.
#[derive(Debug, Clone)]
pub struct ScriptedSampler {
    fractions: Vec<f64>,
    cursor: usize,
}

impl ScriptedSampler {
    pub fn new(fractions: Vec<f64>) -> Self {
        Self { fractions, cursor: 0 }
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl UniformSampler for ScriptedSampler {
    fn sample(&mut self, min: f64, max: f64) -> f64 {
        let f = if self.fractions.is_empty() {
            0.0
        } else {
            self.fractions[self.cursor % self.fractions.len()]
        };
        self.cursor += 1;
        if max <= min {
            return min;
        }
        let f = f.clamp(0.0, 1.0 - f64::EPSILON);
        min + f * (max - min)
    }
}
